//! Types shared by the client, the lifecycle manager and the command surface

pub mod car;
pub mod tx;

pub use car::{Phase, Quota};
pub use tx::{Receipt, ReceiptStatus, SigningContext, TransactionIntent, TxState, WriteCall};
