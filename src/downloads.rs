use std::collections::BTreeSet;

use crate::TwibbonResult;

/// Who is asking, as far as request headers tell.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ClientIdentity {
    /// Client address; empty when no proxy header carried one.
    pub ip: String,
    /// `user-agent` header; empty when absent.
    pub user_agent: String,
}

impl ClientIdentity {
    /// Build an identity from raw request headers. Header names match case-insensitively.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cf = None;
        let mut real = None;
        let mut forwarded = None;
        let mut user_agent = None;
        for (name, value) in headers {
            let slot = match name.to_ascii_lowercase().as_str() {
                "cf-connecting-ip" => &mut cf,
                "x-real-ip" => &mut real,
                "x-forwarded-for" => &mut forwarded,
                "user-agent" => &mut user_agent,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.trim());
            }
        }

        let forwarded_first = forwarded
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let ip = cf
            .filter(|s| !s.is_empty())
            .or(real.filter(|s| !s.is_empty()))
            .or(forwarded_first)
            .unwrap_or_default();

        Self {
            ip: ip.to_string(),
            user_agent: user_agent.unwrap_or_default().to_string(),
        }
    }
}

/// Download log collaborator.
pub trait DownloadLog {
    /// Whether `client` has already been logged.
    fn has_logged(&self, client: &ClientIdentity) -> TwibbonResult<bool>;
    /// Record a download by `client`.
    fn log(&mut self, client: &ClientIdentity) -> TwibbonResult<()>;
    /// Distinct clients logged so far.
    fn count(&self) -> TwibbonResult<u64>;
}

/// In-memory [`DownloadLog`].
#[derive(Clone, Debug, Default)]
pub struct MemoryDownloadLog {
    seen: BTreeSet<ClientIdentity>,
}

impl MemoryDownloadLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DownloadLog for MemoryDownloadLog {
    fn has_logged(&self, client: &ClientIdentity) -> TwibbonResult<bool> {
        Ok(self.seen.contains(client))
    }

    fn log(&mut self, client: &ClientIdentity) -> TwibbonResult<()> {
        self.seen.insert(client.clone());
        Ok(())
    }

    fn count(&self) -> TwibbonResult<u64> {
        Ok(self.seen.len() as u64)
    }
}

/// Counts avatar downloads once per client.
#[derive(Debug)]
pub struct DownloadTracker<L> {
    log: L,
}

impl<L: DownloadLog> DownloadTracker<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// Log a download by `client` unless already logged. Returns whether it was new.
    pub fn record(&mut self, client: &ClientIdentity) -> TwibbonResult<bool> {
        if self.log.has_logged(client)? {
            tracing::debug!(ip = %client.ip, "download already logged");
            return Ok(false);
        }
        self.log.log(client)?;
        Ok(true)
    }

    /// Distinct downloads so far.
    pub fn count(&self) -> TwibbonResult<u64> {
        self.log.count()
    }
}
