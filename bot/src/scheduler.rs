use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rolimons::{Config, HttpClient, PostOutcome, TradeAd};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

const SECONDS_PER_MINUTE: u64 = 60;

pub(crate) trait AdPoster {
    async fn post(&self, player_id: i64, ad: &TradeAd) -> PostOutcome;
}

impl AdPoster for HttpClient {
    async fn post(&self, player_id: i64, ad: &TradeAd) -> PostOutcome {
        self.post_ad(player_id, ad).await
    }
}

/// Random wait between posts, in minutes. Both bounds are multiplied by
/// `failure_backoff` after a failed post.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DelayPolicy {
    min_minutes: u64,
    max_minutes: u64,
    failure_backoff: u64,
}

impl DelayPolicy {
    pub(crate) fn new(min_minutes: u64, max_minutes: u64, failure_backoff: u64) -> Self {
        Self {
            min_minutes,
            max_minutes: max_minutes.max(min_minutes),
            failure_backoff: failure_backoff.max(1),
        }
    }

    fn bounds(&self, success: bool) -> (u64, u64) {
        if success {
            (self.min_minutes, self.max_minutes)
        } else {
            (
                self.min_minutes.saturating_mul(self.failure_backoff),
                self.max_minutes.saturating_mul(self.failure_backoff),
            )
        }
    }

    pub(crate) fn next_delay<R: Rng>(&self, success: bool, rng: &mut R) -> u64 {
        let (low, high) = self.bounds(success);
        rng.gen_range(low..=high)
    }
}

fn wait_for(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(SECONDS_PER_MINUTE))
}

impl From<&Config> for DelayPolicy {
    fn from(config: &Config) -> Self {
        Self::new(config.min_delay, config.max_delay, config.failure_backoff)
    }
}

pub(crate) struct Scheduler<P> {
    poster: P,
    player_id: i64,
    ads: Vec<TradeAd>,
    delay: DelayPolicy,
    rng: StdRng,
}

impl<P: AdPoster> Scheduler<P> {
    pub(crate) fn new(poster: P, config: Config) -> Self {
        Self {
            poster,
            player_id: config.player_id,
            delay: DelayPolicy::from(&config),
            ads: config.trade_ads,
            rng: StdRng::from_entropy(),
        }
    }

    /// Posts ads in order, wrapping around, until `token` is cancelled.
    /// A failed post only lengthens the following wait.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        if self.ads.is_empty() {
            warn!("No trade ads configured, nothing to post");
            return;
        }

        let mut counter: usize = 0;
        let mut posted: u64 = 0;

        while !token.is_cancelled() {
            let ad = &self.ads[counter % self.ads.len()];
            info!("Posting trade ad #{} ({})", counter + 1, ad.name);

            let outcome = self.poster.post(self.player_id, ad).await;
            posted += 1;
            let minutes = self.delay.next_delay(outcome.success, &mut self.rng);

            info!("Waiting {minutes} minutes before next ad...");
            tokio::select! {
                _ = sleep(wait_for(minutes)) => {}
                _ = token.cancelled() => break,
            }

            counter = counter.wrapping_add(1);
        }

        info!("Scheduler stopped after {posted} posts");
    }
}
