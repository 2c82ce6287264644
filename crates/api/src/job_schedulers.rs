use crate::occurrence::purge_old_occurrences::PurgeOldOccurrencesUseCase;
use crate::occurrence::sweep_due_occurrences::SweepDueOccurrencesUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep_until, Instant};
use mealmind_infra::MealmindContext;
use std::time::Duration;

/// How often terminal occurrences are checked against the retention window
const RETENTION_SWEEP_SECS: u64 = 60 * 60;

/// Seconds until the next whole minute. The sweep ticks on minute
/// boundaries so reminder times line up with the start of a cycle.
pub fn secs_to_next_minute(now_ts_millis: i64) -> u64 {
    (60 - (now_ts_millis / 1000) % 60) as u64
}

pub fn start_delivery_sweep_job(ctx: MealmindContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let start = Instant::now() + Duration::from_secs(secs_to_next_minute(now));
        sleep_until(start).await;

        let mut sweep_interval = interval(Duration::from_secs(ctx.config.sweep_interval_secs));
        loop {
            sweep_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(async move {
                let _ = execute(SweepDueOccurrencesUseCase, &context).await;
            });
        }
    });
}

pub fn start_retention_job(ctx: MealmindContext) {
    actix_web::rt::spawn(async move {
        let mut purge_interval = interval(Duration::from_secs(RETENTION_SWEEP_SECS));
        loop {
            purge_interval.tick().await;
            let _ = execute(PurgeOldOccurrencesUseCase, &ctx).await;
        }
    });
}
