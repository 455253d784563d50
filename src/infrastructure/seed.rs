use sea_orm::DatabaseConnection;

use crate::domain::{DomainError, NewRegistration, RegistrationRepository, RegistrationStatus};
use crate::infrastructure::SeaOrmRegistrationRepository;
use crate::models::event::{EventStatus, NewEvent};
use crate::services::event_service;

fn team(
    team_name: &str,
    leader: (&str, &str),
    mobile: &str,
    dept: &str,
    member2: (&str, &str),
    status: RegistrationStatus,
) -> NewRegistration {
    NewRegistration {
        team_name: team_name.to_owned(),
        leader_name: leader.0.to_owned(),
        email: leader.1.to_owned(),
        mobile: mobile.to_owned(),
        college: "Government College of Engineering".to_owned(),
        leader_dept: dept.to_owned(),
        member2_name: member2.0.to_owned(),
        member2_email: member2.1.to_owned(),
        member2_dept: dept.to_owned(),
        member3_name: None,
        member3_email: None,
        member3_dept: None,
        project_title: None,
        project_description: None,
        git_link: None,
        notes: None,
        status: Some(status),
    }
}

/// Insert demo teams and schedule entries into empty tables.
/// Returns how many registrations were created.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<usize, DomainError> {
    let repo = SeaOrmRegistrationRepository::new(db.clone());

    let mut created = 0;
    if repo.count().await? == 0 {
        let teams = vec![
            team(
                "Byte Busters",
                ("Asha Rao", "asha.rao@example.com"),
                "9876543210",
                "AIML",
                ("Ravi Kumar", "ravi.kumar@example.com"),
                RegistrationStatus::Pending,
            ),
            team(
                "Neural Nomads",
                ("Karthik S", "karthik.s@example.com"),
                "8123456789",
                "AIML",
                ("Divya P", "divya.p@example.com"),
                RegistrationStatus::Selected,
            ),
            team(
                "Stack Smashers",
                ("Meera N", "meera.n@example.com"),
                "7012345678",
                "CS",
                ("Arjun V", "arjun.v@example.com"),
                RegistrationStatus::NotSelected,
            ),
        ];

        for input in teams {
            repo.create(input).await?;
            created += 1;
        }
    }

    if event_service::list_events(db, Some(EventStatus::Published))
        .await?
        .is_empty()
    {
        let year = chrono::Utc::now().format("%Y");
        for (title, date, time) in [
            ("Opening Ceremony", format!("{}-12-01", year), "09:00"),
            ("Final Pitches", format!("{}-12-02", year), "14:00"),
        ] {
            event_service::create_event(
                db,
                NewEvent {
                    title: title.to_owned(),
                    description: None,
                    event_date: date,
                    event_time: time.to_owned(),
                    location: Some("Main Auditorium".to_owned()),
                    event_type: Some("hackathon".to_owned()),
                    max_capacity: Some(200),
                    status: EventStatus::Published,
                    created_by: None,
                },
            )
            .await?;
        }
    }

    tracing::info!("Demo data seeded ({} registrations)", created);
    Ok(created)
}
