use super::args::{SubmitArgs, TokenCommand};
use crate::config::Config;
use crate::queue::{Priority, QueueStats, SubmitTokenRequest, Token};
use crate::service::QueueService;
use anyhow::Result;

/// Run one console operation against any queue service
pub async fn execute_token_command<Q: QueueService + ?Sized>(
    queue: &Q,
    command: &TokenCommand,
) -> Result<()> {
    tracing::debug!("Token command {:?} via {}", command, queue.name());

    match command {
        TokenCommand::Submit(args) => {
            let token = queue.submit(&submit_request(args)).await?;
            println!("🎫 Issued {}", describe_token(&token));
        }
        TokenCommand::List => {
            let tokens = queue.list().await?;
            if tokens.is_empty() {
                println!("ℹ️ No tokens in queue");
            }
            for token in &tokens {
                println!("  {}", describe_token(token));
            }
        }
        TokenCommand::Stats => {
            let stats = queue.stats().await?;
            print!("{}", format_stats(&stats));
        }
        TokenCommand::CallNext => match queue.call_next().await? {
            Some(token) => println!("📢 Now serving {}", describe_token(&token)),
            None => println!("ℹ️ No patients waiting"),
        },
        TokenCommand::Complete => match queue.mark_completed().await? {
            Some(token) => println!("✅ Completed {}", describe_token(&token)),
            None => println!("ℹ️ Nobody is being served"),
        },
        TokenCommand::Remove { id } => {
            let token = queue.remove(id).await?;
            println!("🗑️ Removed {}", describe_token(&token));
        }
        TokenCommand::Clear => {
            queue.clear().await?;
            println!("🧹 Queue cleared");
        }
    }
    Ok(())
}

pub fn submit_request(args: &SubmitArgs) -> SubmitTokenRequest {
    let priority = if args.emergency {
        Priority::Emergency
    } else {
        Priority::Normal
    };

    SubmitTokenRequest {
        patient_name: Some(args.name.clone()),
        age: Some(args.age.into()),
        gender: Some(args.gender.clone()),
        problem: Some(args.problem.clone()),
        priority: Some(priority.as_str().to_string()),
    }
}

/// One-line summary, e.g. `Q003 Asha Rao (34, Female) ENT [emergency] Waiting`
pub fn describe_token(token: &Token) -> String {
    let marker = if token.priority.is_emergency() {
        " [emergency]"
    } else {
        ""
    };
    format!(
        "{} {} ({}, {}) {}{} {} id={}",
        token.token_number,
        token.patient_name,
        token.age,
        token.gender,
        token.problem,
        marker,
        token.status.as_str(),
        token.id
    )
}

pub fn format_stats(stats: &QueueStats) -> String {
    let serving = stats
        .current_serving
        .as_ref()
        .map(|t| t.token_number.as_str())
        .unwrap_or("-");

    let mut out = String::new();
    out.push_str(&format!("Now serving:    {}\n", serving));
    out.push_str(&format!("Waiting:        {}\n", stats.waiting_count));
    out.push_str(&format!("Completed:      {}\n", stats.completed_count));
    out.push_str(&format!("Total:          {}\n", stats.total));
    out.push_str(&format!(
        "Estimated wait: {} min\n",
        stats.estimated_wait_minutes
    ));
    out.push_str(&format!(
        "Today:          {} tokens, {} active queues\n",
        stats.today_token_count, stats.active_queues_count
    ));
    for token in &stats.tokens {
        out.push_str(&format!("  {}\n", describe_token(token)));
    }
    out
}

/// Human-readable dump of the effective configuration
pub fn format_config(config: &Config) -> String {
    let mut out = String::new();
    out.push_str("Server config:\n");
    out.push_str(&format!("  host: {}\n", config.server.host));
    out.push_str(&format!("  port: {}\n", config.server.port));
    out.push_str(&format!("  log_level: {}\n", config.server.log_level));
    out.push_str("\nQueue config:\n");
    out.push_str(&format!("  storage: {:?}\n", config.queue.storage));
    out.push_str(&format!("  data_dir: {}\n", config.queue.data_dir.display()));
    out.push_str(&format!("  seed_demo_data: {}\n", config.queue.seed_demo_data));
    out.push_str(&format!(
        "  minutes_per_patient: {}\n",
        config.queue.minutes_per_patient
    ));
    out.push_str("\nClient config:\n");
    out.push_str(&format!("  base_url: {}\n", config.client.base_url));
    out.push_str(&format!("  timeout_ms: {}\n", config.client.timeout_ms));
    out.push_str(&format!("  cache_dir: {}\n", config.client.cache_dir.display()));
    out.push_str(&format!("  seed_demo_data: {}\n", config.client.seed_demo_data));
    out.push_str("\nAdmin config:\n");
    out.push_str(&format!("  username: {}\n", config.admin.username));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{create_shared_manager, TokenStatus};

    fn args(name: &str, emergency: bool) -> SubmitArgs {
        SubmitArgs {
            name: name.to_string(),
            age: 52,
            gender: "Male".to_string(),
            problem: "Cardiology".to_string(),
            emergency,
        }
    }

    #[test]
    fn test_submit_request_validates() {
        let patient = submit_request(&args("Ravi", true)).validate().unwrap();
        assert_eq!(patient.patient_name, "Ravi");
        assert_eq!(patient.age, 52);
        assert_eq!(patient.priority, Priority::Emergency);
    }

    #[tokio::test]
    async fn test_execute_against_local_queue() {
        let queue = create_shared_manager();

        execute_token_command(&queue, &TokenCommand::Submit(args("A", false)))
            .await
            .unwrap();
        execute_token_command(&queue, &TokenCommand::Submit(args("B", true)))
            .await
            .unwrap();
        execute_token_command(&queue, &TokenCommand::CallNext)
            .await
            .unwrap();

        let stats = queue.stats().await.unwrap();
        let serving = stats.current_serving.unwrap();
        assert_eq!(serving.patient_name, "B");
        assert_eq!(serving.status, TokenStatus::InProgress);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_fails() {
        let queue = create_shared_manager();
        let result = execute_token_command(
            &queue,
            &TokenCommand::Remove {
                id: "missing".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_format_stats_without_serving() {
        let stats = crate::queue::QueueState::new().stats(5);
        let text = format_stats(&stats);
        assert!(text.contains("Now serving:    -"));
        assert!(text.contains("Estimated wait: 0 min"));
    }

    #[test]
    fn test_format_config_hides_password() {
        let text = format_config(&Config::default());
        assert!(text.contains("port: 5000"));
        assert!(!text.contains("admin123"));
    }
}
