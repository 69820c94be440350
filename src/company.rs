//! Fixed company identity rendered on every document.
//!
//! These are deliberately constants rather than configuration: the documents
//! belong to a single business and the letterhead never changes at runtime.

pub const NAME: &str = "ALEX'S FUNERAL SERVICES";
pub const ADDRESS_LINES: [&str; 3] = ["30 Suncity", "Orchard, De Doorns", "6840"];
pub const PHONE: &str = "067 333 4472";
pub const EMAIL: &str = "anhamburo14@gmail.com";

pub const REGISTRATION_NUMBER: &str = "K2020920761";
pub const BANK_ACCOUNT_NAME: &str = "AMN Funeral Services";
pub const BANK_NAME: &str = "FNB";
pub const BANK_ACCOUNT_NUMBER: &str = "63092451681";
pub const TAGLINE: &str = "Ready To Serve The Community";

pub const CURRENCY_SYMBOL: &str = "R";
pub const CURRENCY_CODE: &str = "ZAR";
