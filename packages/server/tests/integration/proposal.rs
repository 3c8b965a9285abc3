use crate::common::{TestApp, routes};

mod review {
    use super::*;

    #[tokio::test]
    async fn organizer_approves_a_pending_proposal() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let student = app.create_student("annlee").await;
        let h = app.create_hackathon(&org.token, "Spark", 10, false).await;
        let reg = app.register_solo(&h, &student).await;

        let res = app.put_with_token(&routes::approve(&reg), &org.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "approved");
        assert_eq!(res.body["hackathon"]["name"], "Spark");
        assert_eq!(res.body["hackathon"]["venue"], "Main Hall");
        assert_eq!(res.body["hackathon"]["isTeamHackathon"], false);
    }

    #[tokio::test]
    async fn reviewing_is_idempotent_and_overwritable() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let student = app.create_student("annlee").await;
        let h = app.create_hackathon(&org.token, "Spark", 10, false).await;
        let reg = app.register_solo(&h, &student).await;

        let first = app.put_with_token(&routes::reject(&reg), &org.token).await;
        let second = app.put_with_token(&routes::reject(&reg), &org.token).await;
        assert_eq!(first.body["status"], "rejected");
        assert_eq!(second.body["status"], "rejected");

        let res = app.put_with_token(&routes::approve(&reg), &org.token).await;
        assert_eq!(res.body["status"], "approved");
    }

    #[tokio::test]
    async fn only_the_owning_organizer_or_an_admin_may_review() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let other = app.create_organizer("otherclub").await;
        let student = app.create_student("annlee").await;
        let h = app.create_hackathon(&org.token, "Spark", 10, false).await;
        let reg = app.register_solo(&h, &student).await;

        let res = app.put_with_token(&routes::approve(&reg), &other.token).await;
        assert_eq!(res.status, 403);
        let res = app.put_with_token(&routes::approve(&reg), &student.token).await;
        assert_eq!(res.status, 403);

        let admin = app.admin_token().await;
        let res = app.put_with_token(&routes::reject(&reg), &admin).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "rejected");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;

        let res = app
            .put_with_token(
                &routes::approve("0190a0b5-1111-7000-8000-000000000000"),
                &org.token,
            )
            .await;
        assert_eq!(res.status, 404);

        let res = app.put_with_token(&routes::approve("abc123"), &org.token).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Invalid proposal ID");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn organizer_sees_own_proposals_newest_first() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let ann = app.create_student("annlee").await;
        let bob = app.create_student("bobby").await;
        let h = app.create_hackathon(&org.token, "Spark", 10, false).await;
        app.register_solo(&h, &ann).await;
        let newest = app.register_solo(&h, &bob).await;

        let res = app.get_with_token(routes::PROPOSALS, &org.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], newest);
        assert_eq!(items[0]["hackathon"]["name"], "Spark");

        let explicit = app
            .get_with_token(&routes::proposals_for(&org.id), &org.token)
            .await;
        assert_eq!(explicit.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn other_organizers_and_students_are_refused() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let other = app.create_organizer("otherclub").await;
        let student = app.create_student("annlee").await;

        let res = app
            .get_with_token(&routes::proposals_for(&org.id), &other.token)
            .await;
        assert_eq!(res.status, 403);

        let res = app.get_with_token(routes::PROPOSALS, &student.token).await;
        assert_eq!(res.status, 403);

        let admin = app.admin_token().await;
        let res = app.get_with_token(routes::PROPOSALS, &admin).await;
        assert_eq!(res.status, 400);
        let res = app
            .get_with_token(&routes::proposals_for(&org.id), &admin)
            .await;
        assert_eq!(res.status, 200);
    }
}
