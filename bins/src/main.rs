use std::{env, sync::Arc};

use dotenv::dotenv;
use eyre::Context;
use ledger::{
    notification::{ClassEvent, ClassObserver},
    Ledger, SubscriptionOracle,
};
use log::info;
use model::ids::MemberId;
use sim_time::SimClock;

/// Stand-in for the external member system: every member is active, nobody
/// ranks as VIP. The real oracle lives outside this repository.
struct PermissiveOracle;

impl SubscriptionOracle for PermissiveOracle {
    fn is_subscription_active(&self, _member_id: MemberId) -> bool {
        true
    }

    fn is_vip_member(&self, _member_id: MemberId) -> bool {
        false
    }
}

struct LogObserver;

impl ClassObserver for LogObserver {
    fn on_class_changed(&self, event: &ClassEvent) {
        info!("class changed: {:?}", event);
    }
}

fn main() -> eyre::Result<()> {
    if let Err(err) = dotenv() {
        info!("Failed to load .env file: {}", err);
    }
    pretty_env_logger::init();
    color_eyre::install()?;

    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let multiplier = env::var("TIME_MULTIPLIER")
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .unwrap_or(1.0);

    info!("starting clock at x{}", multiplier);
    let clock = Arc::new(SimClock::start(multiplier));

    info!("opening storage at {}", data_dir);
    let storage = storage::Storage::open(&data_dir).context("Failed to open storage")?;

    let mut ledger = Ledger::new(storage, Arc::new(PermissiveOracle), clock);
    ledger.subscribe(Arc::new(LogObserver));

    for class in ledger.classes.all() {
        info!(
            "class #{} {} with {}: {}/{} enrolled, {} sessions, {} waitlisted",
            class.id,
            class.name,
            class.coach_name,
            class.enrolled_count(),
            class.capacity,
            class.sessions().count(),
            class.waitlist().len(),
        );
    }
    info!(
        "{} attendance records on the ledger",
        ledger.attendance.all().len()
    );

    ledger.save().context("Failed to save ledger state")?;
    Ok(())
}
