use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the client decides that a response has been received in full.
///
/// Both strategies stop when a read adds no bytes. `Balanced` additionally
/// stops as soon as the outer envelope's parentheses close, so a server that
/// keeps the connection open does not stall the client.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Framing {
    /// Stop once the envelope's brackets balance or the peer goes quiet.
    #[default]
    Balanced,
    /// Stop only when a read adds no bytes.
    Quiescent,
}
