use channels::ChannelError;
use common::ChannelId;
use thiserror::Error;

/// Errors from targeted aggregation operations.
///
/// `UnknownChannel` is a caller programming error and deliberately distinct
/// from a channel being unreachable; it must never be swallowed into the
/// partial-failure path.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// The requested channel is not in the configured set.
    #[error("unknown channel: {0}")]
    UnknownChannel(ChannelId),

    /// The targeted channel reported a failure.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
