//! Full reconciliation runs over mixed project portfolios.

use super::helpers::{ProjectFixture, days, engine, scenario_now, stored};
use rstest::{fixture, rstest};
use tessellate::project::{
    adapters::memory::InMemoryProjectStorage,
    domain::{ApplicationStatus, ExpirationPolicy, Milestone, ProjectStatus},
    services::SkipReason,
};

#[fixture]
fn storage() -> InMemoryProjectStorage {
    InMemoryProjectStorage::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_run_settles_every_phase(storage: InMemoryProjectStorage) -> eyre::Result<()> {
    let opening = ProjectFixture::new(ProjectStatus::PendingForReview)
        .milestones([-1, 3, 5, 10])
        .store(&storage)?;
    let closing = ProjectFixture::new(ProjectStatus::AcceptingApplications)
        .milestones([-3, -1, 5, 10])
        .store(&storage)?;
    let unstaffed = ProjectFixture::new(ProjectStatus::WaitingForWorkStart)
        .milestones([-5, -3, -1, 5])
        .application(ApplicationStatus::Pending)
        .store(&storage)?;
    let staffed = ProjectFixture::new(ProjectStatus::WaitingForWorkStart)
        .milestones([-5, -3, -1, 5])
        .application(ApplicationStatus::Pending)
        .application(ApplicationStatus::Accepted)
        .store(&storage)?;
    let overdue = ProjectFixture::new(ProjectStatus::InProgress)
        .milestones([-10, -8, -5, -1])
        .store(&storage)?;
    let abandoned = ProjectFixture::new(ProjectStatus::Expired)
        .milestones([-50, -48, -45, -40])
        .updated(-31)
        .store(&storage)?;
    let delivered = ProjectFixture::new(ProjectStatus::InProgress)
        .milestones([-10, -8, -5, 2])
        .confirmed()
        .store(&storage)?;

    let report = engine(&storage, ExpirationPolicy::default()).run().await?;

    let expected = [
        (opening, ProjectStatus::AcceptingApplications),
        (closing, ProjectStatus::WaitingForWorkStart),
        (unstaffed, ProjectStatus::Cancelled),
        (staffed, ProjectStatus::InProgress),
        (overdue, ProjectStatus::Expired),
        (abandoned, ProjectStatus::Cancelled),
        (delivered, ProjectStatus::Completed),
    ];
    for (id, status) in expected {
        let project = stored(&storage, id)?;
        eyre::ensure!(
            project.status() == status,
            "project {id} is {} instead of {status}",
            project.status()
        );
        eyre::ensure!(project.lifecycle().updated_at() == scenario_now());
    }
    eyre::ensure!(report.changed_count() == expected.len());
    eyre::ensure!(report.count_for(ProjectStatus::Cancelled) == 2);
    eyre::ensure!(storage.commit_count()? == 1);

    let staffed = stored(&storage, staffed)?;
    let winner = staffed
        .accepted_application()
        .ok_or_else(|| eyre::eyre!("staffed project lost its accepted application"))?;
    eyre::ensure!(staffed.freelancer_id() == Some(winner.freelancer_id()));
    eyre::ensure!(stored(&storage, unstaffed)?.freelancer_id().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_runs_reach_a_fixed_point(storage: InMemoryProjectStorage) -> eyre::Result<()> {
    for fixture in [
        ProjectFixture::new(ProjectStatus::PendingForReview).milestones([-1, 3, 5, 10]),
        ProjectFixture::new(ProjectStatus::WaitingForWorkStart)
            .milestones([-5, -3, -1, 5])
            .application(ApplicationStatus::Accepted)
            .application(ApplicationStatus::Accepted),
        ProjectFixture::new(ProjectStatus::InProgress).milestones([-10, -8, -5, -1]),
    ] {
        fixture.store(&storage)?;
    }
    let engine = engine(&storage, ExpirationPolicy::default());

    let first = engine.run().await?;
    let second = engine.run().await?;
    let third = engine.run().await?;

    eyre::ensure!(first.changed_count() == 3);
    eyre::ensure!(second.changed_count() == 0 && second.unchanged() == 3);
    eyre::ensure!(second.changes() == third.changes());
    eyre::ensure!(storage.pending_writes()? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_project_waits_out_the_grace_period(
    storage: InMemoryProjectStorage,
) -> eyre::Result<()> {
    let recent = ProjectFixture::new(ProjectStatus::Expired)
        .milestones([-20, -18, -15, -12])
        .updated(-12)
        .store(&storage)?;
    let policy = ExpirationPolicy::new(14)?;

    engine(&storage, policy).run().await?;
    eyre::ensure!(stored(&storage, recent)?.status() == ProjectStatus::Expired);
    eyre::ensure!(stored(&storage, recent)?.lifecycle().updated_at() == days(-12));

    engine(&storage, ExpirationPolicy::new(12)?).run().await?;
    eyre::ensure!(stored(&storage, recent)?.status() == ProjectStatus::Cancelled);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_serialises_changes_and_skips(storage: InMemoryProjectStorage) -> eyre::Result<()> {
    let opening = ProjectFixture::new(ProjectStatus::PendingForReview)
        .milestones([-1, 3, 5, 10])
        .store(&storage)?;
    let malformed = ProjectFixture::new(ProjectStatus::AcceptingApplications)
        .milestones([-1, 4, 2, 10])
        .store(&storage)?;

    let report = engine(&storage, ExpirationPolicy::default()).run().await?;
    let json = serde_json::to_value(&report)?;

    eyre::ensure!(json["evaluated"] == 2);
    eyre::ensure!(json["changes"][0]["project_id"] == opening.to_string());
    eyre::ensure!(json["changes"][0]["to"] == "accepting_applications");
    eyre::ensure!(json["changes"][0]["reason"] == "applications_opened");
    eyre::ensure!(json["skipped"][0]["project_id"] == malformed.to_string());
    eyre::ensure!(json["skipped"][0]["reason"]["kind"] == "milestones_out_of_order");
    eyre::ensure!(json["skipped"][0]["reason"]["earlier"] == "applications_deadline");
    eyre::ensure!(
        report.skipped().first().map(|skipped| &skipped.reason)
            == Some(&SkipReason::MilestonesOutOfOrder {
                earlier: Milestone::ApplicationsDeadline,
                later: Milestone::WorkStart,
            })
    );
    Ok(())
}
