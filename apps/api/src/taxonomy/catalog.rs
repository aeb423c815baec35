//! The built-in technology catalog used for profile README scanning.

use crate::taxonomy::{Category, Subcategory, Taxonomy, Term};

fn literals(labels: &[&str]) -> Vec<Term> {
    labels.iter().map(|l| Term::literal(l)).collect()
}

fn aliased(entries: &[(&str, &[&str])]) -> Vec<Term> {
    entries
        .iter()
        .map(|(label, keywords)| Term::new(label, keywords))
        .collect()
}

fn category(name: &str, subcategories: Vec<Subcategory>) -> Category {
    Category {
        name: name.to_string(),
        subcategories,
    }
}

/// Languages report their display name; frameworks report the framework key;
/// database, devops and ML entries report the matched keyword itself.
pub fn default_taxonomy() -> Taxonomy {
    Taxonomy::new(vec![
        category(
            "frontend",
            vec![
                Subcategory::new(
                    "languages",
                    literals(&["HTML", "CSS", "JavaScript", "TypeScript"]),
                ),
                Subcategory::new(
                    "frameworks",
                    aliased(&[
                        ("react", &["react", "jsx", "next.js"]),
                        ("angular", &["angular", "ng"]),
                        ("vue", &["vue", "nuxt"]),
                        ("svelte", &["svelte"]),
                        ("bootstrap", &["bootstrap"]),
                        ("tailwind", &["tailwind"]),
                    ]),
                ),
            ],
        ),
        category(
            "backend",
            vec![
                Subcategory::new(
                    "languages",
                    literals(&["Python", "Java", "PHP", "Ruby", "Go", "C#", "Node.js"]),
                ),
                Subcategory::new(
                    "frameworks",
                    aliased(&[
                        ("django", &["django"]),
                        ("flask", &["flask"]),
                        ("fastapi", &["fastapi"]),
                        ("spring", &["spring boot", "spring framework"]),
                        ("express", &["express.js", "express"]),
                        ("laravel", &["laravel"]),
                        ("rails", &["ruby on rails"]),
                    ]),
                ),
            ],
        ),
        category(
            "database",
            vec![
                Subcategory::new(
                    "sql",
                    literals(&["mysql", "postgresql", "sqlite", "sql server"]),
                ),
                Subcategory::new(
                    "nosql",
                    literals(&["mongodb", "redis", "cassandra", "firebase"]),
                ),
                Subcategory::new(
                    "orm",
                    literals(&["sqlalchemy", "hibernate", "prisma", "sequelize"]),
                ),
            ],
        ),
        category(
            "devops",
            vec![
                Subcategory::new(
                    "containerization",
                    literals(&["docker", "kubernetes", "container"]),
                ),
                Subcategory::new(
                    "ci_cd",
                    literals(&["github actions", "jenkins", "travis", "gitlab ci"]),
                ),
                Subcategory::new("cloud", literals(&["aws", "azure", "gcp", "cloud"])),
            ],
        ),
        category(
            "ai_ml",
            vec![
                Subcategory::new(
                    "ml",
                    literals(&["tensorflow", "pytorch", "scikit-learn", "keras"]),
                ),
                Subcategory::new(
                    "data",
                    literals(&["pandas", "numpy", "matplotlib", "seaborn"]),
                ),
                Subcategory::new(
                    "nlp",
                    literals(&["nltk", "spacy", "transformers", "huggingface"]),
                ),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_categories() {
        let tax = default_taxonomy();
        let names: Vec<_> = tax.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["frontend", "backend", "database", "devops", "ai_ml"]);
    }

    #[test]
    fn test_language_labels_keep_display_case() {
        let found = default_taxonomy().find_technologies("a small typescript app");
        assert!(found.contains("TypeScript"));
    }

    #[test]
    fn test_framework_alias_reports_framework_key() {
        let found = default_taxonomy().find_technologies("rest api on spring boot");
        assert!(found.contains("spring"));
        assert!(!found.contains("spring boot"));
    }

    #[test]
    fn test_keyword_lists_flatten_aliases() {
        let tax = default_taxonomy();
        let lists = tax.keyword_lists("backend").unwrap();
        let frameworks = &lists.iter().find(|(name, _)| *name == "frameworks").unwrap().1;
        assert!(frameworks.contains(&"express.js"));
        assert!(frameworks.contains(&"ruby on rails"));
    }
}
