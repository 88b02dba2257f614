use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;

/// Load settings from `.env`, an optional `configuration` file and the
/// process environment. Environment keys are matched lower-cased, so
/// `PAYPAL_CLIENT_ID` populates a `paypal_client_id` field.
pub fn load<T: DeserializeOwned>() -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(Environment::default())
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Deserialize settings from a single environment source.
pub fn from_environment<T: DeserializeOwned>(environment: Environment) -> Result<T, AppError> {
    let config = Cfg::builder().add_source(environment).build()?;

    Ok(config.try_deserialize()?)
}
