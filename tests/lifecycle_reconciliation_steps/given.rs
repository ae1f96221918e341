//! Given steps for lifecycle reconciliation BDD scenarios.

use super::helpers::ProjectFixture;
use super::world::ReconciliationWorld;
use rstest_bdd_macros::given;
use tessellate::project::domain::{ApplicationStatus, ExpirationPolicy, ProjectStatus};

#[given(r#"a project in status "{status}""#)]
fn project_in_status(world: &mut ReconciliationWorld, status: String) -> Result<(), eyre::Report> {
    let status = ProjectStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    world.pending_project = Some(ProjectFixture::new(status));
    Ok(())
}

#[given(r#"its milestones are offset by "{offsets}" days"#)]
fn milestones_offset_by(
    world: &mut ReconciliationWorld,
    offsets: String,
) -> Result<(), eyre::Report> {
    let parsed = offsets
        .split(',')
        .map(|offset| offset.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()?;
    let schedule: [i64; 4] = parsed
        .try_into()
        .map_err(|rejected: Vec<i64>| eyre::eyre!("expected four offsets, got {rejected:?}"))?;
    world.refine_project(|fixture| fixture.milestones(schedule))
}

#[given("its status last changed {elapsed:i64} days ago")]
fn status_last_changed(world: &mut ReconciliationWorld, elapsed: i64) -> Result<(), eyre::Report> {
    world.refine_project(|fixture| fixture.updated(-elapsed))
}

#[given(r#"it has an application in status "{status}""#)]
fn has_application(world: &mut ReconciliationWorld, status: String) -> Result<(), eyre::Report> {
    let status = ApplicationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid application status in scenario: {err}"))?;
    world.refine_project(|fixture| fixture.application(status))
}

#[given("its acceptance has been confirmed")]
fn acceptance_confirmed(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    world.refine_project(ProjectFixture::confirmed)
}

#[given("the expiration grace period is {days:u32} days")]
fn grace_period(world: &mut ReconciliationWorld, days: u32) -> Result<(), eyre::Report> {
    world.policy = ExpirationPolicy::new(days)?;
    Ok(())
}
