//! App State - Minimal observable-store demo
//!
//! Registers a few listeners, applies some writes, and prints what fired.
//!
//! Run: cargo run -p observable-store --example app_state
//! Set OBSERVABLE_STORE_LOG_MODE=debug for verbose logs.

use observable_store::prelude::*;
use observable_store::logging::LOG_MODE_ENV_VAR;
use observable_store::{init_logging, init_logging_from_env, LoggingMode, Property};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Theme(String);

impl Property for Theme {
    const KEY: &'static str = "theme";
}

#[derive(Serialize)]
struct Session {
    user: &'static str,
    unread: u32,
}

fn main() -> Result<()> {
    let config = StoreConfig::new().with_debug(true);

    let logging = if std::env::var_os(LOG_MODE_ENV_VAR).is_some() {
        init_logging_from_env()
    } else {
        init_logging(LoggingMode::for_config(&config))
    };
    if let Err(e) = logging {
        eprintln!("logging disabled: {e}");
    }

    let initial = match json!({"theme": "light", "unread": 0}) {
        Value::Object(map) => map,
        _ => State::new(),
    };
    let store = ObservableStore::with_config(initial, config);

    store.on_any_changed(|key, old, new| {
        println!("[any]   {key}: {old:?} -> {new}");
    });
    store.on_changed("unread", |old, new| {
        println!("[badge] unread {} -> {new}", old.map_or("nothing".to_string(), Value::to_string));
    });
    store.on_property_changed::<Theme, _>(|_, new| {
        if let Some(Theme(name)) = new {
            println!("[theme] repaint with {name}");
        }
    });

    let changes = store.changes();

    store.set(Theme("dark".to_string()))?;
    store.set(Theme("dark".to_string()))?; // unchanged, nothing fires
    let changed = store.set_state_from(Session { user: "ada", unread: 3 })?;
    println!("session update changed {changed} properties");

    println!("queued change events:");
    for event in changes.try_iter() {
        println!("  {} (new: {})", event.key, event.is_insert());
    }

    store.clear_state();
    println!("after clear: {} properties", store.get_state().len());

    Ok(())
}
