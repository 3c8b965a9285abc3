use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

mod sign_up {
    use super::*;

    #[tokio::test]
    async fn student_can_sign_up_and_receives_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER_STUDENT,
                &json!({
                    "name": "Ann Lee",
                    "email": "ann@x.com",
                    "username": "annlee",
                    "password": PASSWORD,
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["user"]["username"], "annlee");
        assert_eq!(res.body["user"]["userType"], "student");
        assert!(res.body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn duplicate_email_and_username_conflict() {
        let app = TestApp::spawn().await;
        app.create_student("annlee").await;

        let res = app
            .post_without_token(
                routes::REGISTER_STUDENT,
                &json!({
                    "name": "Other",
                    "email": "annlee@students.test",
                    "username": "someone",
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["message"], "Email already in use");

        let res = app
            .post_without_token(
                routes::REGISTER_STUDENT,
                &json!({
                    "name": "Other",
                    "email": "other@x.com",
                    "username": "annlee",
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        assert_eq!(res.body["message"], "Username already taken");
    }

    #[tokio::test]
    async fn weak_input_is_rejected() {
        let app = TestApp::spawn().await;

        for body in [
            json!({"name": "A", "email": "ann@x.com", "username": "annlee", "password": PASSWORD}),
            json!({"name": "Ann", "email": "ann@x", "username": "annlee", "password": PASSWORD}),
            json!({"name": "Ann", "email": "ann@x.com", "username": "ann", "password": PASSWORD}),
            json!({"name": "Ann", "email": "ann@x.com", "username": "annlee", "password": "short"}),
        ] {
            let res = app.post_without_token(routes::REGISTER_STUDENT, &body).await;
            assert_eq!(res.status, 400, "accepted {body}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn organizer_requires_an_address() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER_ORGANIZER,
                &json!({
                    "name": "Spark Club",
                    "email": "club@x.com",
                    "username": "sparkclub",
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .post_without_token(
                routes::REGISTER_ORGANIZER,
                &json!({
                    "name": "Spark Club",
                    "email": "club@x.com",
                    "username": "sparkclub",
                    "password": PASSWORD,
                    "address": "1 Campus Road",
                    "certificate": "CERT-42",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user"]["userType"], "organizer");
        assert_eq!(res.body["user"]["certificate"], "CERT-42");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let res = app
            .post_without_token(routes::REGISTER_STUDENT, &json!({"name": "Ann"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn student_and_organizer_log_in_against_their_own_table() {
        let app = TestApp::spawn().await;
        app.create_student("annlee").await;
        app.create_organizer("sparkclub").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "annlee", "password": PASSWORD, "userType": "student"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["userType"], "student");

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "sparkclub", "password": PASSWORD, "userType": "organizer"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "annlee", "password": PASSWORD, "userType": "organizer"}),
            )
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_student("annlee").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "annlee", "password": "wrongpass", "userType": "student"}),
            )
            .await;
        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn admin_logs_in_separately() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "root", "password": "admin-password", "userType": "admin"}),
            )
            .await;
        assert_eq!(res.status, 400);

        let token = app.admin_token().await;
        let me = app.get_with_token(routes::ME, &token).await;
        assert_eq!(me.status, 200);
        assert_eq!(me.body["userType"], "admin");
        assert_eq!(me.body["username"], "root");
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn me_requires_a_valid_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app.get_with_token(routes::ME, "garbage").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");

        let student = app.create_student("annlee").await;
        let res = app.get_with_token(routes::ME, &student.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], student.id);
    }
}
