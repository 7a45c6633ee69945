//! Process-wide sliding-window admission guard

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use log::{debug, warn};

/// Timestamps of admitted requests within the last window.
///
/// Owned by whoever serves requests and passed in explicitly; the
/// server keeps one behind a mutex in its shared state.
#[derive(Debug, Clone)]
pub struct RateWindow
{   max_requests: usize
  , window: Duration
  , log: VecDeque<Instant>
}

impl RateWindow
{   pub fn new(max_requests: usize, window: Duration) -> Self
    {   debug!(
          "Creating rate window: {} requests / {:?}",
          max_requests, window
        );
        RateWindow
        {   max_requests
          , window
          , log: VecDeque::new()
        }
    }

    pub fn from_config(config: &crate::config::RateConfig) -> Self
    {   RateWindow::new(
          config.max_requests
        , Duration::from_secs(config.window_secs)
        )
    }

    /// Drop every entry older than the window, as seen from `now`
    pub fn prune(&mut self, now: Instant)
    {   while let Some(oldest) = self.log.front()
        {   if now.saturating_duration_since(*oldest) < self.window
            {   break;
            }
            self.log.pop_front();
        }
    }

    /// True when the window is full at `now`
    pub fn is_limited(&mut self, now: Instant) -> bool
    {   self.prune(now);
        self.log.len() >= self.max_requests
    }

    /// Record a request issued at `now`
    pub fn record(&mut self, now: Instant)
    {   self.log.push_back(now);
    }

    /// Admission check: prune, test, then log on success.
    pub fn try_admit_at(&mut self, now: Instant)
      -> Result<(), crate::error::Error>
    {   if self.is_limited(now)
        {   warn!(
              "Rate window full: {} requests in {:?}",
              self.log.len(), self.window
            );
            return Err(crate::error::Error::RateLimitExceeded);
        }
        self.record(now);
        Ok(())
    }

    pub fn try_admit(&mut self) -> Result<(), crate::error::Error>
    {   self.try_admit_at(Instant::now())
    }

    /// Entries currently in the window
    pub fn len(&self) -> usize
    {   self.log.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.log.is_empty()
    }

    pub fn max_requests(&self) -> usize
    {   self.max_requests
    }
}

impl Default for RateWindow
{   fn default() -> Self
    {   RateWindow::from_config(&crate::config::RateConfig::default())
    }
}
