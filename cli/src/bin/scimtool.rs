// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Write;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use clap::ValueEnum;
use slog::Drain;
use slog::Logger;
use slog::info;
use slog::o;

use scimtool::client::ScimClient;
use scimtool::output;
use scimtool::output::OutputFormat;
use scimtool::walker::CollectionWalker;
use scimtool::walker::delete_resources;
use scimtool::walker::resource_ids;
use scimtool_core::CreateGroupRequest;
use scimtool_core::CreateUserRequest;
use scimtool_core::ResourceType;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Action {
    List,
    Delete,
    Create,
}

#[derive(Debug, Parser)]
#[clap(about = "SCIM user and group management CLI")]
struct Args {
    /// Base URL of the SCIM API
    #[clap(long)]
    url: String,

    /// A Bearer token
    #[clap(long, env = "SCIM_TOKEN", hide_env_values = true)]
    token: String,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Resource type to manage (required for list/delete operations)
    #[clap(long = "type")]
    resource_type: Option<ResourceType>,

    /// Action to perform
    #[clap(long, value_enum, default_value_t = Action::List)]
    action: Action,

    /// Specific resource ID to delete
    #[clap(long)]
    id: Option<String>,

    /// Delay between network calls in seconds
    #[clap(long, default_value_t = 0.5)]
    delay: f64,

    /// Resources to request per page when walking a collection
    #[clap(long, default_value_t = 100)]
    page_size: usize,

    /// Username for new user
    #[clap(long)]
    username: Option<String>,

    /// Email for new user
    #[clap(long)]
    email: Option<String>,

    /// First name for new user
    #[clap(long)]
    first_name: Option<String>,

    /// Last name for new user
    #[clap(long)]
    last_name: Option<String>,

    /// Display name for new group
    #[clap(long)]
    display_name: Option<String>,

    /// External ID for new user or group
    #[clap(long)]
    external_id: Option<String>,

    /// Comma-separated list of member IDs for new group
    #[clap(long)]
    members: Option<String>,

    /// Add a user to a group
    #[clap(long)]
    add_to_group: bool,

    /// User ID for group membership operations
    #[clap(long)]
    user_id: Option<String>,

    /// Group ID for group membership operations
    #[clap(long)]
    group_id: Option<String>,

    /// Skip the confirmation prompt when bulk deleting
    #[clap(long)]
    yes: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::try_parse()?;

    let log = stderr_logger();
    let client =
        ScimClient::new_with_bearer_auth(args.url.clone(), args.token.clone())?;
    let delay = Duration::from_secs_f64(args.delay.max(0.0));

    // Standalone membership operation: patch an existing group without
    // creating anything
    if args.add_to_group && args.action != Action::Create {
        let (Some(user_id), Some(group_id)) = (&args.user_id, &args.group_id)
        else {
            bail!(
                "--user-id and --group-id are required for adding a user to \
                 a group"
            );
        };

        client.add_group_member(group_id, user_id)?;
        println!("Added user {user_id} to group {group_id}");
        return Ok(());
    }

    match args.action {
        Action::Create => run_create(&client, &args, &log),

        Action::List | Action::Delete => {
            let Some(resource_type) = args.resource_type else {
                bail!("--type is required for list and delete operations");
            };

            if args.action == Action::List {
                run_list(&client, resource_type, &args, delay, &log)
            } else {
                run_delete(&client, resource_type, &args, delay, &log)
            }
        }
    }
}

fn run_create(
    client: &ScimClient,
    args: &Args,
    log: &Logger,
) -> anyhow::Result<()> {
    if let Some(username) = &args.username {
        let (Some(email), Some(first_name), Some(last_name)) =
            (&args.email, &args.first_name, &args.last_name)
        else {
            bail!(
                "--email, --first-name, and --last-name are required for \
                 user creation"
            );
        };

        let request = CreateUserRequest::new(
            username.clone(),
            email.clone(),
            first_name.clone(),
            last_name.clone(),
            args.external_id.clone(),
        );

        let user = client.create_user(&request)?;

        match args.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&user)?);
            }

            OutputFormat::Pretty => {
                println!("User created successfully:");
                println!("{}", output::format_user(&user));
            }
        }

        // Optionally place the new user in a group
        if args.add_to_group {
            let Some(group_id) = &args.group_id else {
                bail!("--group-id is required with --add-to-group");
            };

            client.add_group_member(group_id, &user.id)?;
            info!(log, "added user {} to group {group_id}", user.id);
        }

        Ok(())
    } else if let Some(display_name) = &args.display_name {
        let member_ids =
            args.members.as_deref().map(split_members).unwrap_or_default();

        let request = CreateGroupRequest::new(
            display_name.clone(),
            args.external_id.clone(),
            member_ids,
        );

        let group = client.create_group(&request)?;

        match args.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&group)?);
            }

            OutputFormat::Pretty => {
                println!("Group created successfully:");
                println!("{}", output::format_group(&group, None));
            }
        }

        Ok(())
    } else {
        bail!(
            "for the create action, provide either --username (for a user) \
             or --display-name (for a group)"
        );
    }
}

fn run_list(
    client: &ScimClient,
    resource_type: ResourceType,
    args: &Args,
    delay: Duration,
    log: &Logger,
) -> anyhow::Result<()> {
    let walker = CollectionWalker::new(
        client,
        resource_type,
        args.page_size,
        delay,
        log.clone(),
    );

    match args.format {
        OutputFormat::Json => {
            let all = walker.collect_all()?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }

        OutputFormat::Pretty => {
            let stdout = std::io::stdout();
            output::write_pretty_listing(
                &mut stdout.lock(),
                resource_type,
                walker,
            )?;
        }
    }

    Ok(())
}

fn run_delete(
    client: &ScimClient,
    resource_type: ResourceType,
    args: &Args,
    delay: Duration,
    log: &Logger,
) -> anyhow::Result<()> {
    // Single-item mode: a failure aborts with a non-zero exit
    if let Some(id) = &args.id {
        client.delete(resource_type, id)?;
        println!("Deleted {} {id}", resource_type);
        return Ok(());
    }

    if !args.yes && !confirm_delete_all(resource_type)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    // Enumerate the whole collection first, then delete item by item. A
    // failed page fetch aborts here, before anything is deleted.
    let walker = CollectionWalker::new(
        client,
        resource_type,
        args.page_size,
        delay,
        log.clone(),
    );
    let ids = resource_ids(&walker.collect_all()?.resources, log);

    let summary = delete_resources(client, resource_type, &ids, delay, log);

    println!();
    println!("Deletion Summary:");
    println!("Successfully deleted: {}", summary.deleted());
    println!("Failed to delete: {}", summary.failed());

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary.results)?);
    }

    Ok(())
}

fn confirm_delete_all(resource_type: ResourceType) -> anyhow::Result<bool> {
    print!(
        "No ID specified. This will delete ALL {}. Are you sure? (yes/no): ",
        resource_type.endpoint()
    );
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

fn split_members(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn stderr_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}
