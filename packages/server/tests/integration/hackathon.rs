use serde_json::json;

use crate::common::{TestApp, days_from_now, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn organizer_creates_an_upcoming_hackathon() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;

        let id = app.create_hackathon(&org.token, "Spark 2025", 10, true).await;
        let res = app.get_without_token(&routes::hackathon(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Spark 2025");
        assert_eq!(res.body["organizerId"], org.id);
        assert_eq!(res.body["organizerName"], "Club sparkclub");
        assert_eq!(res.body["type"], "team-offline");
        assert_eq!(res.body["status"], "upcoming");
        assert_eq!(res.body["isTeamHackathon"], true);
    }

    #[tokio::test]
    async fn students_cannot_create_hackathons() {
        let app = TestApp::spawn().await;
        let student = app.create_student("annlee").await;

        let res = app
            .post_with_token(routes::HACKATHONS, &json!({}), &student.token)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn incomplete_or_inverted_windows_are_rejected() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;

        let res = app
            .post_with_token(
                routes::HACKATHONS,
                &json!({"type": "team-offline", "name": "Spark"}),
                &org.token,
            )
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .post_with_token(
                routes::HACKATHONS,
                &json!({
                    "type": "team-offline",
                    "name": "Spark",
                    "venue": "Hall",
                    "date": days_from_now(10),
                    "regstart": days_from_now(5),
                    "regend": days_from_now(1),
                    "details": "Build",
                    "duration": "24h",
                    "prize": "$1",
                    "isTeamHackathon": true,
                }),
                &org.token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn status_is_derived_and_filterable() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let upcoming = app.create_hackathon(&org.token, "Future", 10, true).await;
        let held = app.create_hackathon(&org.token, "Past", -10, false).await;

        let all = app.get_without_token(routes::HACKATHONS).await;
        assert_eq!(all.status, 200);
        let all = all.body.as_array().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["id"], held, "ordered by date");
        assert_eq!(all[0]["status"], "conducted");
        assert_eq!(all[1]["status"], "upcoming");

        let res = app
            .get_without_token(&format!("{}?status=upcoming", routes::HACKATHONS))
            .await;
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], upcoming);

        let res = app
            .get_without_token(&format!("{}?status=someday", routes::HACKATHONS))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn organizer_listing_requires_a_known_type() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let other = app.create_organizer("otherclub").await;
        app.create_hackathon(&org.token, "Future", 10, true).await;
        let held = app.create_hackathon(&org.token, "Past", -10, true).await;
        app.create_hackathon(&other.token, "Elsewhere", -3, true).await;

        let res = app
            .get_without_token(&routes::organizer_hackathons(&org.id, "conducted"))
            .await;
        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], held);

        let res = app
            .get_without_token(&routes::organizer_hackathons(&org.id, "later"))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::hackathon("0190a0b5-1111-7000-8000-000000000000"))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get_without_token(&routes::hackathon("abc123")).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod report {
    use super::*;

    #[tokio::test]
    async fn owner_downloads_a_pdf_report() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let student = app.create_student("annlee").await;
        let id = app.create_hackathon(&org.token, "Spark 2025", -2, false).await;
        app.register_solo(&id, &student).await;

        let res = app.get_with_token(&routes::hackathon_report(&id), &org.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(
            res.content_disposition.as_deref(),
            Some("attachment; filename=\"Hackathon_Report_Spark 2025.pdf\"")
        );
        assert!(res.starts_with_pdf_magic);
        assert!(res.bytes_len > 0);
    }

    #[tokio::test]
    async fn report_is_restricted_to_owner_and_admin() {
        let app = TestApp::spawn().await;
        let org = app.create_organizer("sparkclub").await;
        let other = app.create_organizer("otherclub").await;
        let id = app.create_hackathon(&org.token, "Spark", 5, true).await;

        let res = app.get_with_token(&routes::hackathon_report(&id), &other.token).await;
        assert_eq!(res.status, 403);

        let admin = app.admin_token().await;
        let res = app.get_with_token(&routes::hackathon_report(&id), &admin).await;
        assert_eq!(res.status, 200);

        let res = app.get_without_token(&routes::hackathon_report(&id)).await;
        assert_eq!(res.status, 401);
    }
}
