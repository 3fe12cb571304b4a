use review_client::api::{Collection, ErrorKind, Route};
use review_client::auth::{guard, AccessDecision};
use review_client::framework::OperationClient;
use review_client::lifecycle::{setup_tracing, ApplicationRoot};
use review_client::model::UserRole;
use review_client::session::Severity;
use serde_json::Value;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let root = ApplicationRoot::from_env()?;
    let session = root.session().clone();

    let authenticator = root.authenticator();
    match guard(&authenticator, &session, UserRole::User).await? {
        AccessDecision::Granted(user) => info!(user_id = user.user_id, "Signed in"),
        AccessDecision::Denied(denial) => {
            warn!(?denial, "Access denied");
            return Ok(());
        }
    }

    let directors = root.find::<Vec<Value>>(&Route::collection(Collection::Directors).build());
    directors.find(Some(root.request_config()), None).await?;

    match directors.settled().await? {
        Ok(response) => {
            info!(count = response.data.len(), "Directors loaded");
            session.notify(format!("Loaded {} directors", response.data.len()), Severity::Info);
        }
        Err(failure) => {
            error!(error = %failure, "Loading directors failed");
            let message = match ErrorKind::classify(&failure) {
                ErrorKind::Unauthorized => "Unauthorized. Please reload and try again.",
                ErrorKind::Forbidden => "Forbidden",
                _ => "Unexpected Error",
            };
            session.notify(message, Severity::Error);
        }
    }

    if let Some(notification) = session.notification() {
        info!(severity = %notification.severity, "{}", notification.message);
    }
    Ok(())
}
