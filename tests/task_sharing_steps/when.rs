//! When steps for task sharing BDD scenarios.

use super::world::{SharingWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#""{actor}" shares the task with "{target}""#)]
fn shares_the_task(
    world: &mut SharingWorld,
    actor: String,
    target: String,
) -> Result<(), eyre::Report> {
    let acting = world.account(&actor)?;
    let collaborator = world.account(&target)?;
    let task_id = world.current_task()?.id();
    let result = run_async(world.service.share_task(task_id, collaborator.id(), &acting));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" completes the task"#)]
fn completes_the_task(world: &mut SharingWorld, actor: String) -> Result<(), eyre::Report> {
    let acting = world.account(&actor)?;
    let task_id = world.current_task()?.id();
    let result = run_async(world.service.complete_task(task_id, &acting));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" views the task"#)]
fn views_the_task(world: &mut SharingWorld, actor: String) -> Result<(), eyre::Report> {
    let acting = world.account(&actor)?;
    let task_id = world.current_task()?.id();
    let result = run_async(world.service.find_task(task_id, &acting));
    world.record(result);
    Ok(())
}

#[when("the mark-late job runs")]
fn mark_late_job_runs(world: &mut SharingWorld) {
    world.last_job_result = Some(run_async(world.reclassifier.mark_late()));
}
