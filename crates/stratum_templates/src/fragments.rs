//! Built-in Terraform fragments.
//!
//! Each fragment is a tera template paired with a guard over the intent. The
//! engine renders applicable fragments in table order.

use stratum_intent::Intent;

/// A named template and the condition under which it is rendered.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub name: &'static str,
    pub source: &'static str,
    pub guard: fn(&Intent) -> bool,
}

impl Fragment {
    /// A fragment rendered for every intent.
    pub const fn always(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source,
            guard: always,
        }
    }

    pub const fn when(name: &'static str, source: &'static str, guard: fn(&Intent) -> bool) -> Self {
        Self { name, source, guard }
    }

    pub fn applies(&self, intent: &Intent) -> bool {
        (self.guard)(intent)
    }

    /// Name registered with tera. The `.tf` suffix keeps autoescaping off.
    pub fn template_name(&self) -> String {
        format!("{}.tf", self.name)
    }
}

fn always(_: &Intent) -> bool {
    true
}

fn has_database(intent: &Intent) -> bool {
    intent.has_database()
}

fn has_load_balancer(intent: &Intent) -> bool {
    intent.load_balancer()
}

pub const PROVIDER: &str = include_str!("../templates/provider.tf.tera");
pub const NETWORK: &str = include_str!("../templates/network.tf.tera");
pub const COMPUTE: &str = include_str!("../templates/compute.tf.tera");
pub const DATABASE: &str = include_str!("../templates/database.tf.tera");
pub const LOAD_BALANCER: &str = include_str!("../templates/load_balancer.tf.tera");
pub const VARIABLES: &str = include_str!("../templates/variables.tf.tera");
pub const OUTPUTS: &str = include_str!("../templates/outputs.tf.tera");

/// Main resource graph, then variables, then outputs.
pub fn builtin_fragments() -> Vec<Fragment> {
    vec![
        Fragment::always("provider", PROVIDER),
        Fragment::always("network", NETWORK),
        Fragment::always("compute", COMPUTE),
        Fragment::when("database", DATABASE, has_database),
        Fragment::when("load_balancer", LOAD_BALANCER, has_load_balancer),
        Fragment::always("variables", VARIABLES),
        Fragment::always("outputs", OUTPUTS),
    ]
}
