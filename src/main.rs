use clap::Parser;
use picking_list::{cli, config, error, gateway, reconcile, terminal};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use gateway::{HttpGateway, PickingGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "picking_list=debug" } else { "picking_list=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Shipments { all } => {
            println!("📦 picking - cargas\n");

            let gateway = HttpGateway::new(&config)?;
            let shipments = gateway.fetch_shipments().await?;
            let shipments = terminal::sort_open_shipments(shipments, all);

            if shipments.is_empty() {
                println!("Nenhuma carga pendente");
            }
            for shipment in &shipments {
                println!("{}", terminal::render_shipment(shipment));
            }
        }

        Commands::View { shipment } => {
            let gateway = HttpGateway::new(&config)?;
            let pallets = gateway::load_shipment(&gateway, &shipment).await?;

            if pallets.is_empty() {
                return Err(error::PickingError::ShipmentNotFound(shipment));
            }

            println!("📦 Carga {} - {} paletes\n", shipment, pallets.len());
            for (i, pallet) in pallets.iter().enumerate() {
                println!("{}\n", terminal::render_pallet(pallet, i, pallets.len()));
            }
        }

        Commands::Pick { shipment, pallet } => {
            println!("📦 picking - Carga {}\n", shipment);

            let gateway = HttpGateway::new(&config)?;
            let mut reconciler = reconcile::Reconciler::open(gateway, &shipment).await?;

            if let Some(pallet_id) = pallet {
                if !reconciler.select_pallet(&pallet_id).await? {
                    println!("Palete {} não encontrado, iniciando pelo primeiro", pallet_id);
                }
            }

            terminal::run_pick_session(&mut reconciler).await?;
        }

        Commands::Config { set_url, set_user, set_password, show } => {
            let mut config = config;
            let changed = !set_url.is_empty() || set_user.is_some() || set_password.is_some();

            for assignment in &set_url {
                config.set_url(assignment)?;
            }
            if let Some(user) = set_user {
                config.username = Some(user);
            }
            if let Some(password) = set_password {
                config.password = Some(password);
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let unset = "未設定".to_string();
                println!("設定:");
                println!("  shipments: {}", config.shipments_url.as_ref().unwrap_or(&unset));
                println!("  pallets:   {}", config.pallets_url.as_ref().unwrap_or(&unset));
                println!("  items:     {}", config.items_url.as_ref().unwrap_or(&unset));
                println!("  ユーザー:  {}", config.username.as_ref().unwrap_or(&unset));
                println!("  パスワード: {}", if config.password.is_some() { "設定済み" } else { "未設定" });
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
