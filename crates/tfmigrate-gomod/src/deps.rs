//! Dependency bundles required by the muxed provider.

use crate::gomod::GoMod;
use crate::version::GoVersion;

pub const FRAMEWORK_MODULE: &str = "github.com/hashicorp/terraform-plugin-framework";
pub const MUX_MODULE: &str = "github.com/hashicorp/terraform-plugin-mux";
pub const PLUGIN_GO_MODULE: &str = "github.com/hashicorp/terraform-plugin-go";

/// The SDK module whose version selects the bundle.
pub const SDK_MODULE: &str = "github.com/hashicorp/terraform-plugin-sdk/v2";
/// First SDK version the modern bundle is compatible with.
pub const SDK_MODERN_CUTOFF: &str = "v2.34.0";

/// A mutually compatible set of framework, mux and plugin-go versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bundle {
    pub name: &'static str,
    pub framework: &'static str,
    pub mux: &'static str,
    pub plugin_go: &'static str,
}

impl Bundle {
    /// `(module, version)` pairs in a fixed order.
    pub fn modules(&self) -> [(&'static str, &'static str); 3] {
        [
            (FRAMEWORK_MODULE, self.framework),
            (MUX_MODULE, self.mux),
            (PLUGIN_GO_MODULE, self.plugin_go),
        ]
    }

    /// The bundle's modules at the versions `gomod` requires, falling back
    /// to the bundle version for modules it does not require.
    ///
    /// After [`GoMod::ensure_requires`] a required version is never older
    /// than the bundle's, so this is what `go mod download` should fetch.
    pub fn required_versions(&self, gomod: &GoMod) -> Vec<(&'static str, String)> {
        self.modules()
            .into_iter()
            .map(|(module, fallback)| {
                let version = gomod
                    .require(module)
                    .map_or(fallback, |req| req.version.as_str());
                (module, version.to_string())
            })
            .collect()
    }
}

pub const LEGACY_BUNDLE: Bundle = Bundle {
    name: "legacy",
    framework: "v1.0.0",
    mux: "v0.8.0",
    plugin_go: "v0.14.2",
};

pub const MODERN_BUNDLE: Bundle = Bundle {
    name: "modern",
    framework: "v1.17.0",
    mux: "v0.21.0",
    plugin_go: "v0.29.0",
};

/// Modern bundle iff the required SDK version is valid and at least the cutoff.
pub fn select_bundle(gomod: &GoMod) -> Bundle {
    let sdk = gomod
        .require(SDK_MODULE)
        .and_then(|req| GoVersion::parse(&req.version));
    let modern = match (sdk, GoVersion::parse(SDK_MODERN_CUTOFF)) {
        (Some(sdk), Some(cutoff)) => sdk >= cutoff,
        _ => false,
    };
    let bundle = if modern { MODERN_BUNDLE } else { LEGACY_BUNDLE };
    tracing::debug!(bundle = bundle.name, "selected dependency bundle");
    bundle
}
