//! Token codecs for sessions and tickets

mod legacy;
mod session;
mod ticket;

pub use legacy::LegacyWindow;
pub use session::{SessionClaims, SessionService};
pub use ticket::{is_signed_ticket, TicketCodec};

/// Which decoder accepted a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Signed,
    Legacy,
}

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: String,
    pub format: TokenFormat,
}
