use aula_client::{check_pending_activity, fetch_context, resolve_navigation, GuardOptions};
use aula_core::nav::REDIRECT_STATUS;
use aula_core::{FetchEnvelope, LtiContext, Navigation};

use crate::tab::Tab;

/// `aula context`
pub async fn context(tab: &Tab, json: bool) -> anyhow::Result<()> {
    let result = fetch_context(&tab.client).await;
    if json {
        let envelope = FetchEnvelope::from(&result);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }
    match result {
        Ok(ctx) => print_context(&ctx),
        Err(e) => println!("LTI context unavailable: {e}"),
    }
    Ok(())
}

fn print_context(ctx: &LtiContext) {
    let unset = "(none)";
    println!("User:      {}", ctx.lis_person_name_full.as_deref().unwrap_or(unset));
    println!("Username:  {}", ctx.ext_user_username.as_deref().unwrap_or(unset));
    println!("Roles:     {}", ctx.roles().unwrap_or(unset));
    println!("Placement: {}", ctx.resource_link_id().unwrap_or(unset));
    println!("Class:     {}", classify(ctx));
}

fn classify(ctx: &LtiContext) -> &'static str {
    match (ctx.is_student(), ctx.is_teacher_or_admin()) {
        (true, true) => "student, teacher/admin",
        (true, false) => "student",
        (false, true) => "teacher/admin",
        (false, false) => "unclassified",
    }
}

/// `aula pending`
pub async fn pending(tab: &Tab) -> anyhow::Result<()> {
    let pending = check_pending_activity(&tab.client).await;
    println!("{}", serde_json::to_string_pretty(&pending)?);
    Ok(())
}

/// `aula navigate <path>`
pub async fn navigate(tab: &Tab, path: &str, options: GuardOptions) -> anyhow::Result<()> {
    let nav = resolve_navigation(&tab.client, tab.context, path, options).await;
    match &nav {
        Navigation::Render => println!("render {path}"),
        Navigation::Redirect(target) => {
            tab.location.push(target)?;
            println!("{REDIRECT_STATUS} {path} -> {target}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(roles: &str) -> LtiContext {
        LtiContext {
            roles: Some(roles.into()),
            ..LtiContext::default()
        }
    }

    #[test]
    fn classification_labels() {
        assert_eq!(classify(&ctx("Learner")), "student");
        assert_eq!(classify(&ctx("Instructor,Administrator")), "teacher/admin");
        assert_eq!(classify(&ctx("Learner,Instructor")), "student, teacher/admin");
        assert_eq!(classify(&ctx("Mentor")), "unclassified");
    }
}
