use super::{connect, print_json};

/// Run the `summary` command: totals of every collection.
pub async fn run(config_path: &str, json: bool) -> anyhow::Result<()> {
    let (config, engine) = connect(config_path).await?;
    let counts = engine.counts().await;

    if json {
        return print_json(&counts);
    }

    println!("{}", config.classbook.instance_name);
    println!("{}", "=".repeat(config.classbook.instance_name.chars().count()));
    println!("API:         {}", config.api.base_url);
    println!();
    println!("Courses:     {}", counts.courses);
    println!("Classes:     {}", counts.classes);
    println!("Students:    {}", counts.students);
    println!("Enrollments: {}", counts.enrollments);
    println!("Grades:      {}", counts.grades);

    Ok(())
}
