use devsim_client::traits::{Model, ModelHome};
use devsim_client::RemoteError;
use devsim_primitives::model::{ModelInfo, ModelOrigin};
use tracing::{info, warn};

use crate::error::RunError;

/// Where a model comes from: a named model plus its configuration, or a raw
/// descriptor that names itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelSource {
    Named { name: String, config: String },
    Descriptor { descriptor: String },
}

impl ModelSource {
    pub fn new(name: Option<String>, payload: String) -> Self {
        match name {
            Some(name) => Self::Named {
                name,
                config: payload,
            },
            None => Self::Descriptor {
                descriptor: payload,
            },
        }
    }

    pub fn origin(&self) -> ModelOrigin {
        match self {
            Self::Named { name, .. } => ModelOrigin::NamedConfig { name: name.clone() },
            Self::Descriptor { .. } => ModelOrigin::Descriptor,
        }
    }
}

/// A model handle plus what we learnt about it.
#[derive(Debug)]
pub struct ProvisionedModel<M> {
    pub handle: M,
    pub origin: ModelOrigin,
    /// `None` when introspection failed; it never fails provisioning.
    pub info: Option<ModelInfo>,
}

pub async fn provision<H: ModelHome>(
    home: &H,
    source: &ModelSource,
) -> Result<ProvisionedModel<H::Model>, RunError> {
    let handle = match source {
        ModelSource::Named { name, config } => {
            info!(%name, "Attempting to create model from configuration");
            home.create_with_config(name, config).await
        }
        ModelSource::Descriptor { descriptor } => {
            info!("Attempting to create model from descriptor");
            home.create_from_descriptor(descriptor).await
        }
    }
    .map_err(RunError::Provisioning)?;

    let info = match introspect(&handle).await {
        Ok(info) => {
            info!(
                name = %info.name,
                ids = %info.capabilities_list(),
                "Model created"
            );
            Some(info)
        }
        Err(err) => {
            warn!(%err, "Model introspection failed");
            None
        }
    };

    Ok(ProvisionedModel {
        handle,
        origin: source.origin(),
        info,
    })
}

async fn introspect<M: Model>(model: &M) -> Result<ModelInfo, RemoteError> {
    let name = model.name().await?;
    let capabilities = model.capabilities().await?;

    Ok(ModelInfo { name, capabilities })
}
