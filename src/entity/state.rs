use rust_decimal::Decimal;

#[derive(Clone, Default, Debug)]
pub enum State {
    #[default]
    Start,
    AwaitingMnemonic,
    AwaitingRecipient,
    AwaitingAmount {
        recipient: String,
        display: String,
    },
    AwaitingConfirmation {
        recipient: String,
        display: String,
        amount: Decimal,
    },
    AwaitingSplitParticipants,
    AwaitingSplitAmount {
        participants: Vec<String>,
    },
}
