use eyre::{Context as _, Report, Result};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::model::{Request, Response, ResponseData};

use super::{catalog::CatalogSource, Context};

impl<C: CatalogSource> Context<C> {
    /// Answers one JSON request per line of stdin with one JSON response
    /// per line on stdout until stdin is closed.
    pub async fn serve(&self) -> Result<()> {
        let mut lines = BufReader::new(io::stdin()).lines();
        let mut stdout = io::stdout();

        info!("Waiting for requests on stdin");

        while let Some(line) = lines.next_line().await.context("failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_request(&line).await;

            let mut bytes = serde_json::to_vec(&response).context("failed to serialize response")?;
            bytes.push(b'\n');

            stdout
                .write_all(&bytes)
                .await
                .context("failed to write response")?;

            stdout.flush().await.context("failed to flush stdout")?;
        }

        info!("Reached end of input");

        Ok(())
    }

    pub async fn handle_request(&self, line: &str) -> Response {
        let request = match serde_json::from_str::<Request>(line) {
            Ok(request) => request,
            Err(err) => {
                let err = Report::new(err).wrap_err("failed to parse request");
                warn!("{err:?}");

                return Response::error(&err);
            }
        };

        debug!("Handling request {request:?}");

        match self.dispatch(request).await {
            Ok(data) => Response::Ok { data },
            Err(err) => {
                let response = Response::error(&err);
                error!("{:?}", err.wrap_err("Failed to handle request"));

                response
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<ResponseData> {
        match request {
            // requests from the frontend always want fresh catalog data
            Request::GetUnlockedAchievements { object_id, shop } => self
                .get_unlocked_achievements(&object_id, shop, false)
                .await
                .map(ResponseData::Achievements),
            Request::GetUserPreferences => self
                .user_preferences()
                .await
                .map(ResponseData::Preferences),
            Request::UpdateUserPreferences(preferences) => {
                self.update_user_preferences(preferences).await?;

                Ok(ResponseData::Preferences(preferences))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{
        database::Database,
        model::{GameShop, UnlockRecord},
    };

    use super::{
        super::achievements::tests::{definition, StubCatalog},
        *,
    };

    async fn respond(ctx: &Context<StubCatalog>, line: &str) -> Value {
        let response = ctx.handle_request(line).await;

        serde_json::to_value(&response).unwrap()
    }

    async fn context() -> Context<StubCatalog> {
        let db = Database::in_memory().await.unwrap();
        let catalog = StubCatalog::new(vec![definition("A", false), definition("B", true)]);

        Context::with_catalog(db, catalog)
    }

    #[tokio::test]
    async fn achievements_request() {
        let ctx = context().await;

        let line = r#"{"event":"getUnlockedAchievements","objectId":"1","shop":"steam"}"#;
        let response = respond(&ctx, line).await;

        assert_eq!(response["status"], "ok");

        let data = response["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "A");
        assert_eq!(data[0]["icongray"], "https://cdn/A.jpg");
        assert_eq!(data[1]["unlockTime"], Value::Null);
        assert!(data[1].get("description").is_none());
    }

    #[tokio::test]
    async fn preferences_requests() {
        let ctx = context().await;

        let response = respond(&ctx, r#"{"event":"getUserPreferences"}"#).await;
        assert_eq!(response["data"]["showHiddenAchievementsDescription"], false);

        let line = r#"{"event":"updateUserPreferences","showHiddenAchievementsDescription":true}"#;
        let response = respond(&ctx, line).await;
        assert_eq!(response["status"], "ok");

        let response = respond(&ctx, r#"{"event":"getUserPreferences"}"#).await;
        assert_eq!(response["data"]["showHiddenAchievementsDescription"], true);
    }

    #[tokio::test]
    async fn malformed_request() {
        let ctx = context().await;

        let response = respond(&ctx, r#"{"event":"deleteEverything"}"#).await;

        assert_eq!(response["status"], "error");
        assert!(response["message"]
            .as_str()
            .unwrap()
            .starts_with("failed to parse request"));
    }

    #[tokio::test]
    async fn catalog_failure_response() {
        let mut ctx = context().await;
        ctx.catalog.available = false;

        let line = r#"{"event":"getUnlockedAchievements","objectId":"1","shop":"epic"}"#;
        let response = respond(&ctx, line).await;

        assert_eq!(response["status"], "error");
        assert_eq!(response["message"], "catalog unavailable");
    }

    #[tokio::test]
    async fn object_id_with_separator() {
        let ctx = context().await;

        let unlocks = vec![UnlockRecord {
            name: "a".into(),
            unlock_time: 7,
        }];

        ctx.store_unlocks("mod:1", GameShop::Custom, unlocks)
            .await
            .unwrap();

        let line = r#"{"event":"getUnlockedAchievements","objectId":"mod:1","shop":"custom"}"#;
        let response = respond(&ctx, line).await;

        assert_eq!(response["status"], "ok");

        let data = response["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "A");
        assert_eq!(data[0]["unlockTime"], 7);

        let line = r#"{"event":"getUnlockedAchievements","objectId":"mod","shop":"custom"}"#;
        let response = respond(&ctx, line).await;
        assert_eq!(response["data"][0]["unlockTime"], Value::Null);
    }
}
