use crate::common::{TestApp, routes};

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn counts_accounts_and_events() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        app.create_student("annlee").await;
        app.create_student("bobby").await;
        app.create_hackathon(&org.token, "Future", 10, true).await;
        app.create_hackathon(&org.token, "Past", -10, true).await;
        app.create_hackathon(&org.token, "Later", 30, false).await;
        let admin = app.admin_token().await;

        let users = app.get_with_token(routes::USER_COUNTS, &admin).await;
        assert_eq!(users.status, 200, "{}", users.text);
        assert_eq!(users.body["students"], 2);
        assert_eq!(users.body["organizers"], 1);
        assert_eq!(users.body["total"], 3);

        let events = app.get_with_token(routes::EVENT_COUNTS, &admin).await;
        assert_eq!(events.body["total"], 3);
        assert_eq!(events.body["upcoming"], 2);
        assert_eq!(events.body["conducted"], 1);
        assert_eq!(events.body["active"], 2);
    }

    #[tokio::test]
    async fn lists_hackathons_and_accounts() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        app.create_student("annlee").await;
        app.create_hackathon(&org.token, "Later", 30, false).await;
        app.create_hackathon(&org.token, "Sooner", 3, false).await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(routes::ADMIN_HACKATHONS, &admin).await;
        let items = res.body.as_array().unwrap();
        assert_eq!(items[0]["name"], "Sooner");
        assert_eq!(items[1]["name"], "Later");

        let res = app.get_with_token(routes::ADMIN_STUDENTS, &admin).await;
        assert_eq!(res.body[0]["username"], "annlee");
        assert_eq!(res.body[0]["email"], "annlee@students.test");
        assert!(res.body[0].get("password").is_none());

        let res = app.get_with_token(routes::ADMIN_ORGANIZERS, &admin).await;
        assert_eq!(res.body[0]["name"], "Club sparkclub");
    }

    #[tokio::test]
    async fn non_admins_are_refused() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let student = app.create_student("annlee").await;

        for path in [
            routes::USER_COUNTS,
            routes::EVENT_COUNTS,
            routes::ADMIN_HACKATHONS,
            routes::ADMIN_STUDENTS,
            routes::ADMIN_ORGANIZERS,
        ] {
            assert_eq!(app.get_with_token(path, &org.token).await.status, 403);
            assert_eq!(app.get_with_token(path, &student.token).await.status, 403);
        }
    }
}
