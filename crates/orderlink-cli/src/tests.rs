use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["orderlink"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn sync_defaults_to_all_steps() {
    let cli = Cli::try_parse_from(["orderlink", "sync"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            dry_run: false,
            skip_collect: false,
            skip_submit: false,
            skip_dispatch: false,
        })
    ));
}

#[test]
fn sync_accepts_dry_run_and_skips() {
    let cli = Cli::try_parse_from([
        "orderlink",
        "sync",
        "--dry-run",
        "--skip-submit",
        "--skip-dispatch",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            dry_run: true,
            skip_collect: false,
            skip_submit: true,
            skip_dispatch: true,
        })
    ));
}

#[test]
fn watch_schedule_is_optional() {
    let cli = Cli::try_parse_from(["orderlink", "watch"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Watch { schedule: None })
    ));
}

#[test]
fn watch_with_schedule() {
    let cli = Cli::try_parse_from(["orderlink", "watch", "--schedule", "0 */5 * * * *"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Watch { schedule: Some(ref s) }) if s == "0 */5 * * * *"
    ));
}

#[test]
fn resolve_takes_listing_and_days() {
    let cli = Cli::try_parse_from(["orderlink", "resolve", "[일본] 매일 1기가", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Resolve { ref listing, days: 3 }) if listing == "[일본] 매일 1기가"
    ));
}

#[test]
fn resolve_rejects_non_numeric_days() {
    assert!(Cli::try_parse_from(["orderlink", "resolve", "[일본]", "three"]).is_err());
}

#[test]
fn resolve_accepts_negative_days_after_separator() {
    let cli = Cli::try_parse_from(["orderlink", "resolve", "[일본]", "--", "-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Resolve { days: -1, .. })
    ));
}

#[test]
fn catalog_check_with_path() {
    let cli =
        Cli::try_parse_from(["orderlink", "catalog", "check", "--path", "custom.yaml"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Check { path: Some(ref p) }
        }) if p == &PathBuf::from("custom.yaml")
    ));
}

#[test]
fn catalog_show() {
    let cli = Cli::try_parse_from(["orderlink", "catalog", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Show
        })
    ));
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["orderlink", "db", "ping"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["orderlink", "db", "migrate"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn orders_show_and_requeue() {
    let show = Cli::try_parse_from(["orderlink", "orders", "show", "PO-1"]).unwrap();
    assert!(matches!(
        show.command,
        Some(Commands::Orders {
            command: OrdersCommands::Show { ref product_order_id }
        }) if product_order_id == "PO-1"
    ));

    let requeue = Cli::try_parse_from(["orderlink", "orders", "requeue", "PO-1"]).unwrap();
    assert!(matches!(
        requeue.command,
        Some(Commands::Orders {
            command: OrdersCommands::Requeue { .. }
        })
    ));
}

#[test]
fn orders_requires_an_id() {
    assert!(Cli::try_parse_from(["orderlink", "orders", "requeue"]).is_err());
}
