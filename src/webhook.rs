use reqwest::{header, Client, StatusCode};
use tracing::{debug, instrument};

use crate::{error::NotifyError, payload::NotificationPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivered;

/// Posts the payload to the webhook once. Discord answers a successful
/// execution with 204 No Content; anything else is a failure.
#[instrument(skip_all)]
pub async fn notify(
    client: &Client,
    webhook_url: &str,
    payload: &NotificationPayload,
) -> Result<Delivered, NotifyError> {
    let response = client
        .post(webhook_url)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    debug!(%status, "webhook responded");
    if status != StatusCode::NO_CONTENT {
        return Err(NotifyError::Delivery {
            status: status.as_u16(),
        });
    }
    Ok(Delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn no_content_is_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .match_body(Matcher::Exact(r#"{"content":"deploy finished"}"#.to_string()))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let payload = NotificationPayload::build("deploy finished", None, None);
        let url = format!("{}/hook", server.url());
        let result = notify(&Client::new(), &url, &payload).await;

        assert_eq!(result.unwrap(), Delivered);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn sender_fields_reach_the_wire() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_body(Matcher::Json(serde_json::json!({
                "content": "hi",
                "username": "Ansible",
                "avatar_url": "https://www.ansible.com/favicon.ico",
            })))
            .with_status(204)
            .create_async()
            .await;

        let payload = NotificationPayload::build(
            "hi",
            Some("Ansible"),
            Some("https://www.ansible.com/favicon.ico"),
        );
        let url = format!("{}/hook", server.url());
        notify(&Client::new(), &url, &payload).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn other_statuses_are_delivery_errors() {
        // 200 counts too: only 204 means the message was accepted
        for code in [200, 400, 404, 429, 500] {
            let mut server = Server::new_async().await;
            let mock = server
                .mock("POST", "/hook")
                .with_status(code)
                .with_body(r#"{"message": "nope"}"#)
                .expect(1)
                .create_async()
                .await;

            let payload = NotificationPayload::build("deploy finished", None, None);
            let url = format!("{}/hook", server.url());
            let err = notify(&Client::new(), &url, &payload).await.unwrap_err();

            assert!(matches!(err, NotifyError::Delivery { status } if status == code as u16));
            assert_eq!(err.status(), Some(code as u16));
            assert_eq!(err.to_string(), "failed to send message");
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let payload = NotificationPayload::build("deploy finished", None, None);
        let err = notify(&Client::new(), "http://127.0.0.1:1/hook", &payload)
            .await
            .unwrap_err();

        assert!(matches!(err, NotifyError::Transport(_)));
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "failed to send message");
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_the_webhook() {
        let payload = NotificationPayload::build("deploy finished", None, None);
        let err = notify(&Client::new(), "http://127.0.0.1:1/api/webhooks/1/secret-token", &payload)
            .await
            .unwrap_err();

        assert!(!format!("{:?}", err).contains("secret-token"));
        assert!(err.causes().iter().all(|c| !c.contains("secret-token")));
    }

    #[tokio::test]
    async fn transport_errors_keep_the_underlying_cause() {
        let payload = NotificationPayload::build("deploy finished", None, None);
        let err = notify(&Client::new(), "http://127.0.0.1:1/hook", &payload)
            .await
            .unwrap_err();

        // reqwest's own message plus at least the connector's diagnostic
        assert!(err.causes().len() >= 2, "causes: {:?}", err.causes());
    }
}
