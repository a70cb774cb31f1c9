use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use pmk::api;
use pmk::config;
use pmk::draft::{first_invalid_step, is_step_valid, DraftStore, WizardStep};
use pmk::models::{AppState, ClusterDraft, ClusterResource, HelmApp, NodePatch, NodeType};
use pmk::services;
use pmk::util::format_memory_mib;

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    let client = reqwest::Client::builder()
        .user_agent(format!("Pmk/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");
    AppState {
        api_base_url: config::get_api_base_url(),
        api_token: config::get_api_token(),
        draft_file: config::get_draft_file_path(),
        client,
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table
}

fn json_value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            serde_json::to_string(v).unwrap_or_default()
        }
    }
}

fn print_table(value: &serde_json::Value) {
    let mut table = new_table();
    match value {
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                println!("(empty list)");
                return;
            }
            if let Some(first) = arr.iter().find_map(|v| v.as_object()) {
                let headers: Vec<&String> = first.keys().collect();
                table.set_header(&headers);
                for item in arr {
                    if let Some(obj) = item.as_object() {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|k| obj.get(*k).map(json_value_to_string).unwrap_or_default())
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![json_value_to_string(item)]);
                }
            }
        }
        serde_json::Value::Object(obj) => {
            table.set_header(vec!["Field", "Value"]);
            for (k, v) in obj {
                table.add_row(vec![k, &json_value_to_string(v)]);
            }
        }
        _ => {
            println!("{}", json_value_to_string(value));
            return;
        }
    }
    println!("\n{table}\n");
}

fn print_api_response(value: &serde_json::Value) {
    if let Some(obj) = value.as_object() {
        if obj.contains_key("code") && obj.contains_key("data") {
            if let Some(detail) = obj.get("detail").and_then(|v| v.as_str()) {
                println!("{}", detail);
            }
            print_table(&obj["data"]);
            return;
        }
    }
    print_table(value);
}

fn print_draft(draft: &ClusterDraft) {
    println!(
        "\n{} {}  {}",
        Paint::new("Cluster:").bold(),
        Paint::new(&draft.cluster_name).cyan(),
        Paint::new(format!(
            "({} masters, {} workers)",
            draft.master_nodes().len(),
            draft.worker_nodes().len()
        ))
        .dim()
    );

    let mut table = new_table();
    table.set_header(vec![
        "VM ID",
        "Name",
        "Role",
        "IP address",
        "Cores",
        "Memory",
        "Storage pool",
    ]);
    for node in &draft.nodes {
        table.add_row(vec![
            node.vm_id.to_string(),
            node.name.clone(),
            node.node_type.label().to_string(),
            node.ip_address.clone(),
            node.cores.to_string(),
            format_memory_mib(node.memory),
            node.storage_pool.clone(),
        ]);
    }
    println!("\n{table}");

    if !draft.addons.is_empty() {
        println!("\n{}", Paint::new("Add-ons:").bold());
        for addon in &draft.addons {
            match &addon.args {
                Some(args) => println!("  {} ({})", addon.name, args),
                None => println!("  {}", addon.name),
            }
        }
    }
    if !draft.helm_apps.is_empty() {
        let mut table = new_table();
        table.set_header(vec!["Release", "Chart", "Version", "Namespace"]);
        for app in draft.helm_apps.values() {
            table.add_row(vec![
                app.release_name.clone(),
                app.chart_name.clone(),
                app.chart_version.clone(),
                app.namespace.clone(),
            ]);
        }
        println!("\n{table}");
    }
    if !draft.k8s_resources.is_empty() {
        println!("\n{}", Paint::new("Custom resources:").bold());
        for name in draft.k8s_resources.keys() {
            println!("  {}", name);
        }
    }
    println!();
}

fn print_step_validity(draft: &ClusterDraft) {
    for step in WizardStep::all() {
        if is_step_valid(*step, draft) {
            println!("  {} {}", Paint::new("ok").green().bold(), step.label());
        } else {
            println!("  {} {}", Paint::new("--").red().bold(), step.label());
        }
    }
}

async fn load_store_or_exit(state: &AppState) -> DraftStore {
    match services::load_draft_file(&state.draft_file).await {
        Ok(draft) => DraftStore::from_draft(draft),
        Err(e) => {
            tracing::error!(%e, "failed to load draft file");
            eprintln!(
                "{} {}: {}",
                Paint::new("No editable draft at").red(),
                state.draft_file.display(),
                e
            );
            eprintln!(
                "{}",
                Paint::new("Start one with `pmk draft new <cluster-name>`.").yellow()
            );
            process::exit(1);
        }
    }
}

async fn persist_store_or_exit(state: &AppState, store: &DraftStore) {
    if let Err(e) = services::persist_draft_file(&state.draft_file, store.draft()).await {
        eprintln!("{}: {}", Paint::new("Failed to persist draft file").red(), e);
        process::exit(1);
    }
}

fn read_file_or_exit(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{} {}: {}", Paint::new("Failed to read").red(), path, e);
            process::exit(1);
        }
    }
}

fn parse_role_or_exit(role: &str) -> NodeType {
    match NodeType::from_str(role) {
        Some(r) => r,
        None => {
            eprintln!(
                "{} '{}'; {}",
                Paint::new("Unknown role").red(),
                role,
                Paint::new("expected `master` or `worker`").yellow()
            );
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pmk",
    author,
    version,
    about = "Pmk command-line tool",
    long_about = r#"Pmk — provision and manage Kubernetes clusters on your Proxmox VMs.

This tool surfaces a small set of commands to assemble a cluster draft (nodes,
add-ons, Helm apps, custom resources), validate it, and submit it to the
provisioning API. The draft is kept in a local JSON file between invocations
so you can build it up step by step. Use the `--env-file` option or
environment variables to provide API credentials.

Examples:
  1) Start a draft and lay out the nodes:
      pmk draft new demo
      pmk draft add-node master
      pmk draft add-node worker
  2) Enable the load balancer with an IP range:
      pmk draft addon enable load-balancer --args 10.0.0-200
  3) Validate and submit:
      pmk draft validate
      pmk draft submit
"#,
    after_help = "Use `pmk <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration (env vars / API credentials)
    #[command(
        about = "Validate configuration and ensure API connectivity.",
        long_about = "Validate environment variables required by pmk, and validate the configured API token by attempting to fetch the add-on catalog from the remote API."
    )]
    CheckConfig,
    /// Browse the add-on and Helm chart catalogs
    Catalog {
        #[command(subcommand)]
        sub: CatalogCommands,
    },
    /// Manage provisioned clusters via the configured API
    #[command(
        about = "Manage provisioned clusters via the API (list, show, delete)",
        long_about = "These commands make API requests using the current API configuration and token. Be careful with commands that mutate state (delete). Use `--help` on a subcommand for detailed examples."
    )]
    Clusters {
        #[command(subcommand)]
        sub: ClusterCommands,
    },
    /// Edit the local cluster draft and submit it for provisioning
    #[command(
        about = "Build up a cluster draft and submit it",
        long_about = "The draft subcommands mirror the creation wizard: add and size nodes, toggle add-ons, attach Helm apps and custom manifests, then validate and submit. Each command applies one change and persists the draft file."
    )]
    Draft {
        #[command(subcommand)]
        sub: DraftCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List the platform add-ons a cluster can enable
    Addons,
    /// List the Helm charts offered by the platform
    Charts,
}

#[derive(Subcommand)]
enum ClusterCommands {
    /// List provisioned clusters
    List,
    /// Show the raw JSON payload for a cluster ID
    Show { cluster_id: String },
    /// Tear down a provisioned cluster
    #[command(
        about = "Delete a cluster",
        long_about = "Permanently tear down a provisioned cluster and its VMs. Use with care."
    )]
    Delete { cluster_id: String },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Start a new draft (fails if one is already in progress)
    New {
        cluster_name: String,
        /// Overwrite an existing draft file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the current draft
    Show,
    /// Add a node; its VM id, name and IP are derived from the existing nodes
    #[command(
        about = "Add a master or worker node",
        long_about = "Derives the new node's VM id, name and IP address from the nodes already in the draft: the highest same-role node stepped by one, or an offset placement when the draft has no node of that role yet. Sizing is copied from the reference node and can be changed afterwards with `set-node`."
    )]
    AddNode {
        /// `master` or `worker`
        role: String,
    },
    /// Remove a node by VM id
    RemoveNode { vm_id: i64 },
    /// Edit a node's sizing, IP address or storage pool
    SetNode {
        vm_id: i64,
        #[arg(long)]
        cores: Option<i64>,
        /// Memory in MiB
        #[arg(long)]
        memory: Option<i64>,
        #[arg(long)]
        ip_address: Option<String>,
        #[arg(long)]
        storage_pool: Option<String>,
    },
    /// Enable or disable platform add-ons
    Addon {
        #[command(subcommand)]
        sub: AddonCommands,
    },
    /// Attach or detach Helm applications
    Helm {
        #[command(subcommand)]
        sub: HelmCommands,
    },
    /// Attach or detach custom Kubernetes manifests
    Resource {
        #[command(subcommand)]
        sub: ResourceCommands,
    },
    /// Check the draft against the wizard's step gates
    Validate,
    /// Submit the draft to the provisioning API
    #[command(
        about = "Submit the draft for provisioning",
        long_about = "Validates the draft, then sends it to the provisioning API as a single creation request. On success the draft file is discarded; pass --keep to keep it around."
    )]
    Submit {
        /// Keep the draft file after a successful submission
        #[arg(long, default_value_t = false)]
        keep: bool,
    },
    /// Abandon the draft and delete the draft file
    Discard,
}

#[derive(Subcommand)]
enum AddonCommands {
    /// Enable an add-on, optionally with an argument string
    Enable {
        name: String,
        /// Add-on specific argument (e.g. a load balancer IP range `10.0.0-200`)
        #[arg(long)]
        args: Option<String>,
    },
    /// Disable an add-on
    Disable { name: String },
}

#[derive(Subcommand)]
enum HelmCommands {
    /// Add or replace a Helm release in the draft
    Add {
        release_name: String,
        #[arg(long)]
        chart: String,
        #[arg(long)]
        chart_version: String,
        #[arg(long, default_value = "default")]
        namespace: String,
        /// Path to a values.yaml to pass to the chart
        #[arg(long)]
        values_file: Option<String>,
    },
    /// Remove a Helm release from the draft
    Remove { release_name: String },
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// Add or replace a custom manifest in the draft
    Add {
        name: String,
        /// Path to the manifest YAML
        #[arg(long)]
        manifest_file: String,
    },
    /// Remove a custom manifest from the draft
    Remove { name: String },
}

async fn run_draft_command(state: &AppState, sub: DraftCommands) {
    match sub {
        DraftCommands::New {
            cluster_name,
            force,
        } => {
            if state.draft_file.exists() && !force {
                eprintln!(
                    "{} {}; {}",
                    Paint::new("A draft already exists at").red(),
                    state.draft_file.display(),
                    Paint::new("use --force to overwrite or `pmk draft discard` first").yellow()
                );
                process::exit(1);
            }
            let store = DraftStore::new(&cluster_name);
            persist_store_or_exit(state, &store).await;
            println!(
                "{} '{}' {}",
                Paint::new("Draft").green(),
                cluster_name,
                Paint::new("started").green()
            );
        }
        DraftCommands::Show => {
            let store = load_store_or_exit(state).await;
            print_draft(store.draft());
            print_step_validity(store.draft());
        }
        DraftCommands::AddNode { role } => {
            let role = parse_role_or_exit(&role);
            let mut store = load_store_or_exit(state).await;
            store.add_node(role);
            persist_store_or_exit(state, &store).await;
            // add_node always appends, so the new node is the last one
            if let Some(node) = store.draft().nodes.last() {
                println!(
                    "{} {} (VM {}, {})",
                    Paint::new("Added").green(),
                    Paint::new(&node.name).cyan(),
                    node.vm_id,
                    node.ip_address
                );
            }
        }
        DraftCommands::RemoveNode { vm_id } => {
            let mut store = load_store_or_exit(state).await;
            if store.remove_node(vm_id) {
                persist_store_or_exit(state, &store).await;
                println!("{} VM {}", Paint::new("Removed").green(), vm_id);
            } else {
                println!(
                    "{} VM {} {}",
                    Paint::new("No node with id").yellow(),
                    vm_id,
                    Paint::new("in the draft; nothing changed").yellow()
                );
            }
        }
        DraftCommands::SetNode {
            vm_id,
            cores,
            memory,
            ip_address,
            storage_pool,
        } => {
            let patch = NodePatch {
                cores,
                memory,
                ip_address,
                storage_pool,
            };
            if patch.is_empty() {
                eprintln!(
                    "{}",
                    Paint::new("Nothing to change; pass at least one of --cores, --memory, --ip-address, --storage-pool").yellow()
                );
                process::exit(1);
            }
            let mut store = load_store_or_exit(state).await;
            if store.update_node(vm_id, &patch) {
                persist_store_or_exit(state, &store).await;
                println!("{} VM {}", Paint::new("Updated").green(), vm_id);
            } else {
                println!(
                    "{} VM {} {}",
                    Paint::new("No node with id").yellow(),
                    vm_id,
                    Paint::new("in the draft; nothing changed").yellow()
                );
            }
        }
        DraftCommands::Addon { sub } => {
            let mut store = load_store_or_exit(state).await;
            match sub {
                AddonCommands::Enable { name, args } => {
                    store.enable_addon(&name, args);
                    persist_store_or_exit(state, &store).await;
                    println!("{} {}", Paint::new("Enabled").green(), name);
                }
                AddonCommands::Disable { name } => {
                    if store.disable_addon(&name) {
                        persist_store_or_exit(state, &store).await;
                        println!("{} {}", Paint::new("Disabled").green(), name);
                    } else {
                        println!("{} {}", Paint::new("Not enabled:").yellow(), name);
                    }
                }
            }
        }
        DraftCommands::Helm { sub } => {
            let mut store = load_store_or_exit(state).await;
            match sub {
                HelmCommands::Add {
                    release_name,
                    chart,
                    chart_version,
                    namespace,
                    values_file,
                } => {
                    let values = values_file.map(|p| read_file_or_exit(&p)).unwrap_or_default();
                    store.upsert_helm_app(HelmApp {
                        release_name: release_name.clone(),
                        chart_name: chart,
                        chart_version,
                        namespace,
                        values,
                    });
                    persist_store_or_exit(state, &store).await;
                    println!("{} {}", Paint::new("Added release").green(), release_name);
                }
                HelmCommands::Remove { release_name } => {
                    if store.remove_helm_app(&release_name) {
                        persist_store_or_exit(state, &store).await;
                        println!("{} {}", Paint::new("Removed release").green(), release_name);
                    } else {
                        println!("{} {}", Paint::new("No such release:").yellow(), release_name);
                    }
                }
            }
        }
        DraftCommands::Resource { sub } => {
            let mut store = load_store_or_exit(state).await;
            match sub {
                ResourceCommands::Add {
                    name,
                    manifest_file,
                } => {
                    let manifest = read_file_or_exit(&manifest_file);
                    store.upsert_k8s_resource(ClusterResource {
                        name: name.clone(),
                        manifest,
                    });
                    persist_store_or_exit(state, &store).await;
                    println!("{} {}", Paint::new("Added resource").green(), name);
                }
                ResourceCommands::Remove { name } => {
                    if store.remove_k8s_resource(&name) {
                        persist_store_or_exit(state, &store).await;
                        println!("{} {}", Paint::new("Removed resource").green(), name);
                    } else {
                        println!("{} {}", Paint::new("No such resource:").yellow(), name);
                    }
                }
            }
        }
        DraftCommands::Validate => {
            let store = load_store_or_exit(state).await;
            print_step_validity(store.draft());
            if let Some(step) = first_invalid_step(store.draft()) {
                eprintln!(
                    "\n{} {} {}",
                    Paint::new("Draft is not submittable:").red(),
                    step.label(),
                    Paint::new("step is incomplete").red()
                );
                process::exit(1);
            }
            println!("\n{}", Paint::new("Draft is submittable").green());
        }
        DraftCommands::Submit { keep } => {
            let store = load_store_or_exit(state).await;
            if let Some(step) = first_invalid_step(store.draft()) {
                eprintln!(
                    "{} {} {}",
                    Paint::new("Refusing to submit:").red(),
                    step.label(),
                    Paint::new("step is incomplete; run `pmk draft validate`").red()
                );
                process::exit(1);
            }
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}").expect("valid spinner template"),
            );
            spinner.set_message(format!(
                "Submitting cluster '{}'...",
                store.draft().cluster_name
            ));
            spinner.enable_steady_tick(Duration::from_millis(100));
            let payload = services::submit_draft(state, store.draft()).await;
            spinner.finish_and_clear();
            if services::response_ok(&payload) {
                println!(
                    "{} '{}' {}",
                    Paint::new("Cluster").green(),
                    store.draft().cluster_name,
                    Paint::new("submitted for provisioning").green()
                );
                print_api_response(&payload);
                if !keep {
                    if let Err(e) = services::discard_draft_file(&state.draft_file).await {
                        eprintln!(
                            "{}: {}",
                            Paint::new("Submitted, but failed to remove the draft file").yellow(),
                            e
                        );
                    }
                }
            } else {
                eprintln!("{}", Paint::new("Submission failed").red());
                print_api_response(&payload);
                process::exit(1);
            }
        }
        DraftCommands::Discard => {
            let existed = state.draft_file.exists();
            if let Err(e) = services::discard_draft_file(&state.draft_file).await {
                eprintln!("{}: {}", Paint::new("Failed to remove draft file").red(), e);
                process::exit(1);
            }
            if existed {
                println!("{}", Paint::new("Draft discarded").green());
            } else {
                println!("{}", Paint::new("No draft in progress").yellow());
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // CLI parsing
    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        pmk::api::client::set_silent(true);
    }

    let state = build_state_from_env(cli.env_file.as_deref());

    match cli.command {
        Commands::CheckConfig => {
            let mut ok = true;
            if state.api_base_url.trim().is_empty() {
                eprintln!("{}", Paint::new("API_BASE_URL is not configured").red());
                ok = false;
            }
            if state.api_token.trim().is_empty() {
                eprintln!("{}", Paint::new("API_TOKEN is not configured").red());
                ok = false;
            }
            if !ok {
                process::exit(1);
            }
            let resp = api::api_call(
                &state.client,
                &state.api_base_url,
                &state.api_token,
                "GET",
                "/v1/catalog/addons",
                None,
                None,
            )
            .await;
            if services::response_ok(&resp) {
                println!(
                    "{}",
                    Paint::new("Configuration looks valid (catalog returned)").green()
                );
                process::exit(0);
            } else {
                let json_str =
                    serde_json::to_string_pretty(&resp).unwrap_or_else(|_| "<non-json>".into());
                eprintln!(
                    "{}: {}",
                    Paint::new("Configuration appears invalid").red(),
                    json_str
                );
                process::exit(1);
            }
        }
        Commands::Catalog { sub } => match sub {
            CatalogCommands::Addons => {
                let addons =
                    api::load_addon_catalog(&state.client, &state.api_base_url, &state.api_token)
                        .await;
                let mut table = new_table();
                table.set_header(vec!["Name", "Title", "Panel"]);
                for a in &addons {
                    table.add_row(vec![&a.name, &a.title, &a.panel_name]);
                }
                println!("\n{table}\n");
            }
            CatalogCommands::Charts => {
                let charts =
                    api::load_helm_catalog(&state.client, &state.api_base_url, &state.api_token)
                        .await;
                let mut table = new_table();
                table.set_header(vec!["Name", "Title", "Panel"]);
                for c in &charts {
                    table.add_row(vec![&c.name, &c.title, &c.panel_name]);
                }
                println!("\n{table}\n");
            }
        },
        Commands::Clusters { sub } => match sub {
            ClusterCommands::List => {
                let clusters =
                    api::load_clusters(&state.client, &state.api_base_url, &state.api_token).await;
                let mut table = new_table();
                table.set_header(vec!["ID", "Name", "Status", "Nodes"]);
                for c in &clusters {
                    table.add_row(vec![
                        c.id.clone(),
                        c.name.clone(),
                        c.status.clone(),
                        c.node_count.to_string(),
                    ]);
                }
                println!("\n{table}\n");
            }
            ClusterCommands::Show { cluster_id } => {
                let payload = api::get_cluster(
                    &state.client,
                    &state.api_base_url,
                    &state.api_token,
                    &cluster_id,
                )
                .await;
                print_api_response(&payload);
            }
            ClusterCommands::Delete { cluster_id } => {
                let payload = api::delete_cluster(
                    &state.client,
                    &state.api_base_url,
                    &state.api_token,
                    &cluster_id,
                )
                .await;
                print_api_response(&payload);
            }
        },
        Commands::Draft { sub } => {
            run_draft_command(&state, sub).await;
        }
    }
}
