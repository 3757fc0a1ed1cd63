/// Everything that can go wrong while editing, exporting or sending embeds.
///
/// None of these are fatal; the session reports them and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pasted or imported document is not a JSON array of embed objects
    #[error("malformed import: {0}")]
    MalformedImport(String),

    /// An editor referred to a position that does not exist (anymore)
    #[error("{what} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Channel listing failed; callers fall back to an empty listing
    #[error("channel gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// The send request was rejected or never reached the gateway
    #[error("sending embeds failed: {0}")]
    SendFailed(String),

    #[error("no channel selected")]
    NoChannelSelected,

    #[error("no embed has a title or description; nothing to send")]
    NothingToSend,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
