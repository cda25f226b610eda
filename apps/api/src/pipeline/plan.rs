//! Plan limits. Unknown plans are treated as the entry tier.

/// Maximum keywords a project may accumulate under a plan.
pub fn keyword_limit(plan: &str) -> i64 {
    match plan {
        "growth" => 500,
        "pro" | "agency" | "enterprise" => 2000,
        // "free", "starter", and anything unrecognized
        _ => 100,
    }
}

/// Maximum articles generated per calendar month under a plan.
pub fn monthly_content_limit(plan: &str) -> i64 {
    match plan {
        "growth" => 12,
        "pro" | "agency" | "enterprise" => 40,
        _ => 4,
    }
}

/// Feature bullet list shown in the plan-upgrade notification.
pub fn plan_features(plan: &str) -> Vec<String> {
    vec![
        format!("{} keywords tracked", keyword_limit(plan)),
        format!("{} articles/month", monthly_content_limit(plan)),
        match plan {
            "pro" | "agency" | "enterprise" => "Priority support".to_string(),
            _ => "Email support".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_limits_per_plan() {
        assert_eq!(keyword_limit("starter"), 100);
        assert_eq!(keyword_limit("growth"), 500);
        assert_eq!(keyword_limit("pro"), 2000);
        assert_eq!(keyword_limit("agency"), 2000);
    }

    #[test]
    fn test_free_and_unknown_plans_get_entry_limits() {
        assert_eq!(keyword_limit("free"), 100);
        assert_eq!(keyword_limit("unheard-of"), 100);
        assert_eq!(monthly_content_limit("free"), 4);
    }

    #[test]
    fn test_content_limits_per_plan() {
        assert_eq!(monthly_content_limit("starter"), 4);
        assert_eq!(monthly_content_limit("growth"), 12);
        assert_eq!(monthly_content_limit("enterprise"), 40);
    }

    #[test]
    fn test_plan_features_mention_limits() {
        let features = plan_features("pro");
        assert!(features.iter().any(|f| f.contains("2000 keywords")));
        assert!(features.iter().any(|f| f.contains("40 articles")));
        assert!(features.iter().any(|f| f.contains("Priority support")));
    }
}
