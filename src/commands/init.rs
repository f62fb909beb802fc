//! `rebase init` - wires the real collaborators into the workflow.

use anyhow::Result;

use rebase::bootstrap::{self, InitContext, InitOutcome};
use rebase::migrate::SqlMigrator;
use rebase::paths::ProjectPaths;
use rebase::probe::{MySqlProbe, RedisProbe};
use rebase::prompt::StdPrompt;

pub fn execute() -> Result<()> {
    let paths = ProjectPaths::new(std::env::current_dir()?);
    let migrator = SqlMigrator::new(&paths);
    let mut prompt = StdPrompt;

    let mut ctx = InitContext {
        paths,
        prompt: &mut prompt,
        db: &MySqlProbe,
        cache: &RedisProbe,
        migrator: &migrator,
    };

    match bootstrap::run(&mut ctx)? {
        InitOutcome::Completed | InitOutcome::AlreadyInitialized => {}
        InitOutcome::StageFailed => {
            println!("Initialization stopped. Fix the reported problem and run `rebase init` again.");
        }
    }

    Ok(())
}
