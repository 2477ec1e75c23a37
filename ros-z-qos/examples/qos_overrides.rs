//! Resolve the QoS of a publisher or subscription against a parameter file.
//!
//! ```text
//! cargo run --example qos_overrides -- --params-file params.yaml \
//!     --node /talker --topic /chatter --entity publisher \
//!     --policy reliability --policy depth
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ros_z_qos::{
    EntityPolicyRegistry, ParameterStore, QosOverridingOptions, QosPolicyKind, QosProfile,
    overrides::{PARAMETER_NAMESPACE, declare_qos_parameters},
    parameter::yaml::load_parameter_file,
};

#[derive(Debug, Clone, Copy, ValueEnum, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Entity {
    Publisher,
    Subscription,
}

#[derive(Debug, Parser)]
#[command(about = "Resolve QoS overrides for a topic")]
struct Args {
    /// ROS 2 parameter file holding `qos_overrides.*` entries
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Fully qualified node name used to select parameter file sections
    #[arg(long, default_value = "/qos_overrides")]
    node: String,

    #[arg(long, default_value = "/chatter")]
    topic: String,

    #[arg(long, value_enum, default_value = "publisher")]
    entity: Entity,

    /// Entity id, for several entities on the same topic
    #[arg(long, default_value = "")]
    id: String,

    /// Overridable policy (repeatable); defaults to history, depth and reliability
    #[arg(long = "policy", value_parser = parse_policy)]
    policies: Vec<QosPolicyKind>,

    #[arg(long, default_value_t = 10)]
    depth: usize,
}

fn parse_policy(s: &str) -> Result<QosPolicyKind, String> {
    s.parse()
        .map_err(|_| format!("unknown qos policy kind '{}'", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut store = match &args.params_file {
        Some(path) => ParameterStore::with_overrides(load_parameter_file(path, &args.node)?),
        None => ParameterStore::new(),
    };

    let options = if args.policies.is_empty() {
        QosOverridingOptions::with_default_policies()
    } else {
        QosOverridingOptions::new(args.policies.iter().copied())
    }
    .with_id(args.id.clone());

    let entity_type: &str = args.entity.into();
    let registry = EntityPolicyRegistry::standard();
    let entity = registry
        .get(entity_type)
        .ok_or_else(|| format!("no policy set registered for '{entity_type}'"))?;

    let mut qos = QosProfile::keep_last(args.depth);
    declare_qos_parameters(&options, &mut store, &args.topic, &mut qos, entity)?;

    for name in store.names_with_prefix(PARAMETER_NAMESPACE) {
        if let (Some(value), Some(descriptor)) = (store.get(&name), store.describe(&name)) {
            println!("{name} = {value}  # {}", descriptor.description);
        }
    }
    println!("{qos}");
    print!("{}", serde_yaml::to_string(&qos)?);

    Ok(())
}
