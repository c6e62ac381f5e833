use devsim_client::traits::{Connector, Session};
use tracing::info;

use crate::error::ConnectionError;

/// An open session. Releasing it consumes the guard.
#[derive(Debug)]
pub struct SessionGuard<S> {
    session: S,
}

impl<S: Session> SessionGuard<S> {
    pub const fn session(&self) -> &S {
        &self.session
    }

    pub(crate) fn into_inner(self) -> S {
        self.session
    }
}

pub async fn open_session<C: Connector>(
    connector: &C,
) -> Result<SessionGuard<C::Session>, ConnectionError> {
    let session = connector
        .connect()
        .await
        .map_err(ConnectionError::Session)?;

    info!("Successfully connected to the simulation service");

    Ok(SessionGuard { session })
}

/// Checked cast of `name` to a model registry.
pub async fn resolve_registry<S: Session>(
    session: &S,
    name: &str,
    capability: &str,
) -> Result<S::Home, ConnectionError> {
    let home = session
        .checked_cast(name, capability)
        .await
        .map_err(|source| ConnectionError::Resolve {
            name: name.to_owned(),
            source,
        })?;

    let Some(home) = home else {
        return Err(ConnectionError::NotARegistry {
            name: name.to_owned(),
            capability: capability.to_owned(),
        });
    };

    info!(%name, "Successfully cast proxy as registry");

    Ok(home)
}
