use sesame_user::{Command, LoginInput, UserError};

mod helpers;

#[tokio::test]
async fn test_login_failure() -> anyhow::Result<()> {
    let pool = helpers::setup_test_pool().await?;
    let cmd = Command::new(pool);

    let resp = cmd
        .login(LoginInput {
            email: "john.doe@sesame.localhost".to_owned(),
            password: "my_password".to_owned(),
        })
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Invalid email or password");

    let user = helpers::create_user(&cmd, "john.doe").await?;

    let resp = cmd
        .login(LoginInput {
            email: "john.doe@sesame.localhost".to_owned(),
            password: "my_password3".to_owned(),
        })
        .await;
    assert!(matches!(resp, Err(UserError::InvalidCredentials)));

    let resp = cmd
        .login(LoginInput {
            email: "john.doe@sesame.localhos".to_owned(),
            password: "my_password".to_owned(),
        })
        .await;
    assert!(matches!(resp, Err(UserError::InvalidCredentials)));

    let resp = cmd
        .login(LoginInput {
            email: "John.Doe@sesame.localhost".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?;
    assert_eq!(resp, user);

    Ok(())
}

#[tokio::test]
async fn test_login_requires_password() -> anyhow::Result<()> {
    let pool = helpers::setup_test_pool().await?;
    let cmd = Command::new(pool);

    let resp = cmd
        .login(LoginInput {
            email: "john.doe@sesame.localhost".to_owned(),
            password: String::new(),
        })
        .await;
    assert!(matches!(resp, Err(UserError::ValidationError(_))));

    Ok(())
}
