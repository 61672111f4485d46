use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tempfile::tempdir;

use eventsphere_core::{Catalog, QueryParams};
use eventsphere_session::checkout::SimulatedGateway;
use eventsphere_session::config::AppConfig;
use eventsphere_session::forms::LoginForm;
use eventsphere_session::store::JsonFileStore;
use eventsphere_session::{ChangeEvent, Session};

fn zero_delay_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.simulation.checkout_delay_ms = 0;
    config.simulation.login_delay_ms = 0;
    config.simulation.signup_delay_ms = 0;
    config
}

#[tokio::test]
async fn test_browse_collect_and_checkout_flow() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("session.json");
    let config = zero_delay_config();

    // First session: browse, favorite, fill the cart, check out.
    {
        let store = Arc::new(JsonFileStore::open(&path)?);
        let session = Session::new(Catalog::builtin()?, store, &config);
        let mut updates = session.subscribe();

        let params = QueryParams {
            search: "music".to_string(),
            ..QueryParams::default()
        };
        let view = session.query(&params);
        assert!(!view.is_empty());
        let concert = view[0].clone();
        assert_eq!(concert.name, "Music Vibes Night");

        session.favorites().add(&concert)?;
        session.cart().add(&concert)?;
        session.cart().adjust_quantity(concert.id, 1)?;
        assert_eq!(session.cart().total_items()?, 2);

        let summary = session.cart().summary()?;
        assert!((summary.subtotal - 178.0).abs() < 1e-9);
        assert!((summary.total - (summary.subtotal * 1.05 + 2.99)).abs() < 1e-9);

        let gateway = SimulatedGateway::new(Duration::from_millis(10));
        let receipt = session.cart().checkout(&gateway).await?;
        assert_eq!(receipt.item_count, 2);
        assert!((receipt.total - summary.total).abs() < 1e-9);
        assert_eq!(session.cart().total_items()?, 0);

        // The badge counter saw every mutation in order.
        let mut kinds = Vec::new();
        while let Ok(event) = updates.try_recv() {
            kinds.push(event.kind());
        }
        assert_eq!(
            kinds,
            [
                "favoritesUpdated",
                "cartUpdated",
                "cartUpdated",
                "cartUpdated"
            ]
        );
    }

    // Second session over the same file: favorites survived, cart is empty.
    {
        let store = Arc::new(JsonFileStore::open(&path)?);
        let session = Session::new(Catalog::builtin()?, store, &config);
        assert_eq!(session.favorites().total_count()?, 1);
        assert!(session.favorites().contains(2)?);
        assert!(session.cart().entries()?.is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn test_sign_in_survives_a_restart() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("session.json");
    let config = zero_delay_config();

    {
        let store = Arc::new(JsonFileStore::open(&path)?);
        let session = Session::new(Catalog::builtin()?, store, &config);
        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        session.account().login(&form).await?;
    }

    let store = Arc::new(JsonFileStore::open(&path)?);
    let session = Session::new(Catalog::builtin()?, store, &config);
    let profile = session.account().current()?.expect("profile persisted");
    assert_eq!(profile.email, "ada@example.com");
    assert!(session.account().is_logged_in()?);

    Ok(())
}

#[tokio::test]
async fn test_snapshots_carried_on_the_bus_match_storage() -> Result<()> {
    let temp_dir = tempdir()?;
    let store = Arc::new(JsonFileStore::open(temp_dir.path().join("session.json"))?);
    let session = Session::new(Catalog::builtin()?, store, &zero_delay_config());
    let mut updates = session.subscribe();

    let event = session.catalog().get_by_id(4)?.clone();
    session.cart().add(&event)?;

    match updates.recv().await? {
        ChangeEvent::CartUpdated { entries } => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].event.id, 4);
            assert_eq!(entries[0].quantity, 1);
            // Subscribers need not re-read storage, but if they do they see
            // the same thing.
            assert_eq!(session.cart().entries()?.len(), 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    Ok(())
}
