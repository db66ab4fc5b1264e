use crate::player::PlayerInfo;
use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use tokio::task::JoinHandle;
use url::Url;

/// Posts each winner to a spreadsheet web hook.
///
/// Delivery is fire-and-forget: failures are logged and never reach the
/// player, and nothing is retried.
#[derive(Clone, Debug)]
pub struct WinnerLogger {
    client: reqwest::Client,
    url: Option<Url>,
}

impl WinnerLogger {
    pub fn new(url: Option<Url>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build winner log HTTP client")?;
        Ok(Self { client, url })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Spawns the upload and returns its handle, or `None` when no hook is
    /// configured.
    pub fn log_winner(&self, player: &PlayerInfo, winner: &str) -> Option<JoinHandle<()>> {
        let Some(url) = self.url.clone() else {
            tracing::warn!("winner log URL not configured, skipping log");
            return None;
        };
        let form = winner_form(player, winner, Utc::now());
        let client = self.client.clone();
        let winner = winner.to_string();
        Some(tokio::spawn(async move {
            let result = client
                .post(url.clone())
                .form(&form)
                .send()
                .await
                .and_then(|resp| resp.error_for_status());
            match result {
                Ok(resp) => {
                    tracing::info!(status = %resp.status(), winner = %winner, "winner logged");
                }
                Err(e) => {
                    tracing::error!(error = %e, url = %url, "failed to log winner");
                }
            }
        }))
    }
}

/// Form fields in the order the sheet expects them.
pub fn winner_form(
    player: &PlayerInfo,
    winner: &str,
    at: DateTime<Utc>,
) -> [(&'static str, String); 4] {
    [
        ("email", player.email.clone()),
        ("phone", player.phone.clone()),
        ("winner", winner.to_string()),
        ("timestamp", at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use chrono::TimeZone;

    fn player() -> PlayerInfo {
        PlayerInfo {
            email: "you@example.com".to_string(),
            phone: "0909 123 456".to_string(),
        }
    }

    #[test]
    fn winner_form__uses_iso_timestamp_with_millis() {
        // given
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 5).unwrap();

        // when
        let form = winner_form(&player(), "Notebook", at);

        // then
        assert_eq!(
            form,
            [
                ("email", "you@example.com".to_string()),
                ("phone", "0909 123 456".to_string()),
                ("winner", "Notebook".to_string()),
                ("timestamp", "2026-03-01T09:30:05.000Z".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn log_winner__without_url_is_a_no_op() {
        // given
        let logger = WinnerLogger::new(None).unwrap();

        // when
        let handle = logger.log_winner(&player(), "Notebook");

        // then
        assert!(!logger.is_configured());
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn log_winner__unreachable_hook_is_swallowed() {
        // given
        let url = Url::parse("http://127.0.0.1:9/log").unwrap();
        let logger = WinnerLogger::new(Some(url)).unwrap();

        // when
        let handle = logger.log_winner(&player(), "Notebook").unwrap();

        // then
        assert!(handle.await.is_ok());
    }
}
