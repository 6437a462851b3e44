//! Fixture sources: synthetic users, spreadsheet credential rows and
//! payment test data.

mod card;
mod credentials;
mod user;

pub use card::{PaymentCard, PaymentMethod};
pub use credentials::{
    load_negative_credentials, read_negative_credentials, MemoryTable, NegativeCredentialRow,
    SheetRows, TabularSource, WorkbookSource,
};
pub use user::{
    PersistedUser, UserFixture, UserGenerator, DEFAULT_CITY, DEFAULT_COUNTRY, DEFAULT_PASSWORD,
    DEFAULT_STATE, MAX_USERNAME_LEN,
};
