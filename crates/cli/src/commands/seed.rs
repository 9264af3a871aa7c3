use affirmbot_core::CommandProfile;
use affirmbot_db::repositories::SqlAffirmationRepository;
use affirmbot_db::{seed_starter_affirmations, SeedResult};

use crate::commands::{migrated_pool, prepare, CommandResult, StepError};

/// Seeds the configured collection, or every built-in collection with `all`.
pub fn run(all: bool) -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let collections: Vec<&'static str> = if all {
        CommandProfile::KEYS.to_vec()
    } else {
        match config.profile() {
            Ok(profile) => vec![profile.key],
            Err(error) => {
                return CommandResult::failure("seed", "config_validation", error.to_string(), 2)
            }
        }
    };

    let result = runtime.block_on(async {
        let pool = migrated_pool(&config).await?;
        let repository = SqlAffirmationRepository::new(pool.clone());

        let mut results = Vec::with_capacity(collections.len());
        for collection in &collections {
            let seeded = seed_starter_affirmations(&repository, collection)
                .await
                .map_err(|error| ("seed_execution", error.to_string(), 6u8));
            match seeded {
                Ok(seeded) => results.push(seeded),
                Err(error) => {
                    pool.close().await;
                    return Err(error);
                }
            }
        }

        pool.close().await;
        Ok::<Vec<SeedResult>, StepError>(results)
    });

    match result {
        Ok(results) => CommandResult::success("seed", summarize(&results)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summarize(results: &[SeedResult]) -> String {
    let lines = results
        .iter()
        .map(|result| {
            format!(
                "  - {}: {} inserted, {} already present",
                result.collection, result.inserted, result.skipped
            )
        })
        .collect::<Vec<_>>();
    format!("starter affirmations seeded:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use affirmbot_db::SeedResult;

    use super::summarize;

    #[test]
    fn summary_lists_each_collection() {
        let message = summarize(&[
            SeedResult { collection: "customer_affirm".to_owned(), inserted: 5, skipped: 0 },
            SeedResult { collection: "affirm".to_owned(), inserted: 0, skipped: 5 },
        ]);

        assert_eq!(
            message,
            "starter affirmations seeded:\n  - customer_affirm: 5 inserted, 0 already present\n  - affirm: 0 inserted, 5 already present"
        );
    }
}
