#[cfg(test)]
mod test {

    use anyhow::Result;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serial_test::serial;

    use crate::config::settings::{GithubConfig, StatusPolicy};
    use crate::exchange::TokenExchanger;
    use crate::rotation::org::OrganizationName;
    use crate::tests::common::{build_reqwest_client, json, mock_registration};

    fn github_config(server: &MockServer, status_policy: StatusPolicy) -> GithubConfig {
        GithubConfig {
            api_url: server.base_url(),
            status_policy,
            ..GithubConfig::default()
        }
    }

    #[tokio::test]
    #[serial]
    async fn request_carries_token_header_and_org_path() -> Result<()> {
        let github = MockServer::start_async().await;
        let body = json!({"token": "AREG-TOKEN-XYZ", "expires_at": "2024-05-01T11:00:00.000+00:00"}).to_string();
        let registration = mock_registration(&github, "acme", "ghs_abc123", 201, &body).await;

        let client = build_reqwest_client();
        let config = github_config(&github, StatusPolicy::Passthrough);
        let exchanger = TokenExchanger::new(&client, &config);
        let org = OrganizationName::parse("acme")?;

        assert_eq!(
            exchanger.registration_token_url(&org),
            format!("{}/orgs/acme/actions/runners/registration-token", github.base_url())
        );

        let token = exchanger.request_registration_token(&org, b"ghs_abc123").await?;

        registration.assert_calls_async(1).await;
        assert_eq!(token, body.into_bytes());
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn rejecting_policy_fails_on_non_success() -> Result<()> {
        let github = MockServer::start_async().await;
        mock_registration(&github, "acme", "ghs_abc123", 404, r#"{"message":"Not Found"}"#).await;

        let client = build_reqwest_client();
        let config = github_config(&github, StatusPolicy::RejectNonSuccess);
        let exchanger = TokenExchanger::new(&client, &config);

        let err = exchanger
            .request_registration_token(&OrganizationName::parse("acme")?, b"ghs_abc123")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"), "{}", err);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn passthrough_policy_returns_error_body() -> Result<()> {
        let github = MockServer::start_async().await;
        mock_registration(&github, "acme", "ghs_abc123", 500, "oops").await;

        let client = build_reqwest_client();
        let config = github_config(&github, StatusPolicy::Passthrough);
        let exchanger = TokenExchanger::new(&client, &config);

        let token = exchanger
            .request_registration_token(&OrganizationName::parse("acme")?, b"ghs_abc123")
            .await?;
        assert_eq!(token, b"oops".to_vec());
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn admin_token_with_line_break_is_a_request_error() -> Result<()> {
        let github = MockServer::start_async().await;
        let any_call = github
            .mock_async(|when, then| {
                when.method(POST);
                then.status(201);
            })
            .await;

        let client = build_reqwest_client();
        let config = github_config(&github, StatusPolicy::Passthrough);
        let exchanger = TokenExchanger::new(&client, &config);

        let err = exchanger
            .request_registration_token(&OrganizationName::parse("acme")?, b"ghs_abc\n123")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to create registration token request"));
        any_call.assert_calls_async(0).await;
        Ok(())
    }
}
