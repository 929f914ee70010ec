//! Typed access to one interface of one remote object.
//!
//! Every wrapper embeds a [`DbusObject`] and builds its getters, setters and
//! methods from the helpers here. Nothing is cached: each helper performs
//! exactly one round trip.

use log::debug;
use std::any::type_name;
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use super::session::Session;
use crate::api::models::NmError;
use crate::types::constants::paths;
use crate::Result;

#[derive(Debug, Clone)]
pub(crate) struct DbusObject {
    session: Session,
    path: OwnedObjectPath,
    interface: &'static str,
}

impl DbusObject {
    pub(crate) fn new(session: Session, path: OwnedObjectPath, interface: &'static str) -> Self {
        Self {
            session,
            path,
            interface,
        }
    }

    /// The same object seen through another of its interfaces.
    pub(crate) fn with_interface(&self, interface: &'static str) -> Self {
        Self::new(self.session.clone(), self.path.clone(), interface)
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn path(&self) -> &OwnedObjectPath {
        &self.path
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}.{name}", self.interface)
    }

    pub(crate) async fn raw_property(&self, name: &str) -> Result<OwnedValue> {
        debug!("Reading {}.{name} on {}", self.interface, self.path.as_str());
        self.session
            .transport()
            .get_property(&self.path, self.interface, name)
            .await
    }

    /// Reads a property and converts it to `T`.
    pub(crate) async fn property<T>(&self, name: &str) -> Result<T>
    where
        T: TryFrom<Value<'static>>,
    {
        let value = self.raw_property(name).await?;
        decode(&self.qualified(name), value)
    }

    /// Reads an object-path property, mapping the `"/"` sentinel to `None`.
    pub(crate) async fn object_property(&self, name: &str) -> Result<Option<OwnedObjectPath>> {
        let path: OwnedObjectPath = self.property(name).await?;
        Ok(present(path))
    }

    /// Reads an object-path array property, dropping `"/"` entries.
    pub(crate) async fn object_list_property(&self, name: &str) -> Result<Vec<OwnedObjectPath>> {
        let paths: Vec<OwnedObjectPath> = self.property(name).await?;
        Ok(paths.into_iter().filter_map(present).collect())
    }

    pub(crate) async fn set_property<'a>(
        &self,
        name: &str,
        value: impl Into<Value<'a>>,
    ) -> Result<()> {
        let value = arg(value)?;
        self.session
            .transport()
            .set_property(&self.path, self.interface, name, value)
            .await
    }

    pub(crate) async fn call(&self, method: &str, args: Vec<OwnedValue>) -> Result<Vec<OwnedValue>> {
        self.session
            .transport()
            .call(&self.path, self.interface, method, args)
            .await
    }

    /// Calls a method whose reply carries no values.
    pub(crate) async fn call_unit(&self, method: &str, args: Vec<OwnedValue>) -> Result<()> {
        let reply = self.call(method, args).await?;
        if !reply.is_empty() {
            debug!(
                "{} returned {} unexpected value(s), ignoring",
                self.qualified(method),
                reply.len()
            );
        }
        Ok(())
    }

    /// Calls a method that replies with exactly one value.
    pub(crate) async fn call_one<T>(&self, method: &str, args: Vec<OwnedValue>) -> Result<T>
    where
        T: TryFrom<Value<'static>>,
    {
        let context = self.qualified(method);
        let [value] = arity::<1>(&context, self.call(method, args).await?)?;
        decode(&context, value)
    }

    /// Calls a method that replies with exactly two values.
    pub(crate) async fn call_two<A, B>(&self, method: &str, args: Vec<OwnedValue>) -> Result<(A, B)>
    where
        A: TryFrom<Value<'static>>,
        B: TryFrom<Value<'static>>,
    {
        let context = self.qualified(method);
        let [a, b] = arity::<2>(&context, self.call(method, args).await?)?;
        Ok((decode(&context, a)?, decode(&context, b)?))
    }

    /// Calls a method that replies with exactly three values.
    pub(crate) async fn call_three<A, B, C>(
        &self,
        method: &str,
        args: Vec<OwnedValue>,
    ) -> Result<(A, B, C)>
    where
        A: TryFrom<Value<'static>>,
        B: TryFrom<Value<'static>>,
        C: TryFrom<Value<'static>>,
    {
        let context = self.qualified(method);
        let [a, b, c] = arity::<3>(&context, self.call(method, args).await?)?;
        Ok((
            decode(&context, a)?,
            decode(&context, b)?,
            decode(&context, c)?,
        ))
    }
}

/// Converts an untyped value to `T`, reporting the wire signature on failure.
pub(crate) fn decode<T>(what: &str, value: OwnedValue) -> Result<T>
where
    T: TryFrom<Value<'static>>,
{
    let found = value.value_signature().to_string();
    T::try_from(Value::from(value)).map_err(|_| NmError::TypeMismatch {
        property: what.to_string(),
        expected: type_name::<T>(),
        found,
    })
}

/// Prepares a method argument or property value for the wire.
pub(crate) fn arg<'a>(value: impl Into<Value<'a>>) -> Result<OwnedValue> {
    value
        .into()
        .try_to_owned()
        .map_err(|e| NmError::InvalidArgument(e.to_string()))
}

/// Maps the `"/"` sentinel to `None`.
pub(crate) fn present(path: OwnedObjectPath) -> Option<OwnedObjectPath> {
    (path.as_str() != paths::NONE).then_some(path)
}

/// Object path argument for an optional reference; `None` becomes `"/"`.
pub(crate) fn path_arg(path: Option<&OwnedObjectPath>) -> Result<OwnedValue> {
    match path {
        Some(path) => arg(path.clone()),
        None => arg(OwnedObjectPath::try_from(paths::NONE).map_err(|e| {
            NmError::InvalidArgument(e.to_string())
        })?),
    }
}

fn arity<const N: usize>(context: &str, reply: Vec<OwnedValue>) -> Result<[OwnedValue; N]> {
    <[OwnedValue; N]>::try_from(reply).map_err(|reply| NmError::Decode {
        context: context.to_string(),
        reason: format!("expected {N} value(s), got {}", reply.len()),
    })
}

/// Collapses a getter result into a snapshot field, logging what was skipped.
pub(crate) fn best_effort<T>(field: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Leaving {field} out of snapshot: {e}");
            None
        }
    }
}
