use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Verbs accepted by the employee store. Only GET, PUT, POST and DELETE touch
/// the collection; the rest are accepted and ignored.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl HttpMethod {
    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }

    pub fn is_mutation(&self) -> bool {
        match self {
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => true,
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Options | HttpMethod::Patch => false,
        }
    }

    /// Accepted but does nothing, never loads or seeds the collection
    pub fn is_no_op(&self) -> bool {
        !self.is_query() && !self.is_mutation()
    }

    /// PUT and POST refuse a transform that produces no collection, DELETE does not
    pub fn requires_result(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}
