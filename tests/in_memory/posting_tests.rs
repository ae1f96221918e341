//! Projects created through the posting workflow and then reconciled.

use super::helpers::{FixedClock, days, engine};
use rstest::rstest;
use rust_decimal::Decimal;
use tessellate::project::{
    adapters::memory::InMemoryProjectStorage,
    domain::{
        ApplicationStatus, CategoryId, ExpirationPolicy, FreelancerApplication, Milestones,
        Project, ProjectDraft, ProjectStatus, TransitionReason, UserId,
    },
};

fn posted_project(milestones: Milestones) -> eyre::Result<Project> {
    let draft = ProjectDraft::new(
        "Accessibility audit",
        Decimal::new(1_500, 0),
        CategoryId::new(),
        UserId::new(),
    )
    .with_description("WCAG review of the checkout flow");
    Ok(Project::new(draft, milestones, &FixedClock(days(-10)))?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_bid_wins_the_project_when_work_starts() -> eyre::Result<()> {
    let mut project = posted_project(Milestones::new(days(-6), days(-3), days(-1), days(20)))?;
    let winner = FreelancerApplication::new(UserId::new());
    let runner_up = FreelancerApplication::new(UserId::new());
    let winner_id = winner.id();
    let winner_freelancer = winner.freelancer_id();
    project.submit_application(winner);
    project.submit_application(runner_up);
    project.accept_application(winner_id)?;
    let id = project.id();

    let storage = InMemoryProjectStorage::new();
    storage.insert(project)?;
    let report = engine(&storage, ExpirationPolicy::default()).run().await?;

    let change = report
        .change_for(id)
        .ok_or_else(|| eyre::eyre!("project {id} was not changed"))?;
    eyre::ensure!(change.from == ProjectStatus::PendingForReview);
    eyre::ensure!(change.to == ProjectStatus::InProgress);
    eyre::ensure!(change.reason == TransitionReason::FreelancerSelected);
    eyre::ensure!(change.freelancer_id == Some(winner_freelancer));

    let stored = storage
        .find(id)?
        .ok_or_else(|| eyre::eyre!("project {id} missing"))?;
    eyre::ensure!(stored.freelancer_id() == Some(winner_freelancer));
    for application in stored.applications() {
        let expected = if application.id() == winner_id {
            ApplicationStatus::Accepted
        } else {
            ApplicationStatus::Rejected
        };
        eyre::ensure!(application.status() == expected);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_posting_stays_pending_until_applications_open() -> eyre::Result<()> {
    let project = posted_project(Milestones::new(days(2), days(6), days(8), days(30)))?;
    let id = project.id();
    let storage = InMemoryProjectStorage::new();
    storage.insert(project)?;

    let report = engine(&storage, ExpirationPolicy::default()).run().await?;

    eyre::ensure!(report.unchanged() == 1);
    let stored = storage
        .find(id)?
        .ok_or_else(|| eyre::eyre!("project {id} missing"))?;
    eyre::ensure!(stored.status() == ProjectStatus::PendingForReview);
    eyre::ensure!(stored.lifecycle().updated_at() == days(-10));
    Ok(())
}
