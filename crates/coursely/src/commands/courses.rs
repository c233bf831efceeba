//! Course command handlers.

use std::path::Path;

use tabled::Tabled;

use coursely_core::model::cover;
use coursely_core::{Category, Course, CourseDraft, CoursePatch, CourseStore, Level};

use crate::cli::{
    CoursesArgs, CoursesCommand, CreateCourseArgs, GlobalOpts, OutputFormat, UpdateCourseArgs,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Subcategory")]
    subcategory: String,
    #[tabled(rename = "Cover")]
    cover: String,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id.to_string(),
            title: c.title.clone(),
            level: c.level.as_ref().map(ToString::to_string).unwrap_or_default(),
            category: c
                .category
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            subcategory: c.subcategory.clone(),
            cover: if c.has_cover_image() { "yes" } else { "" }.into(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn describe_cover(course: &Course) -> String {
    match course.cover_image.as_deref() {
        None | Some("") => "(none)".into(),
        Some(uri) => cover::describe_data_uri(uri).map_or_else(
            || uri.chars().take(60).collect(),
            |(mime, size)| format!("{mime}, {size} bytes"),
        ),
    }
}

fn detail(course: &Course) -> String {
    let or_dash = |s: &str| if s.is_empty() { "-".to_owned() } else { s.to_owned() };
    let mut lines = vec![
        format!("ID:          {}", course.id),
        format!("Title:       {}", or_dash(&course.title)),
        format!(
            "Level:       {}",
            course.level.as_ref().map_or("-", Level::as_str)
        ),
        format!(
            "Category:    {}",
            course.category.as_ref().map_or("-", Category::as_str)
        ),
        format!("Subcategory: {}", or_dash(&course.subcategory)),
        format!("Cover:       {}", describe_cover(course)),
    ];
    if !course.description.is_empty() {
        lines.push(String::new());
        lines.push(course.description.clone());
    }
    lines.join("\n")
}

// ── Argument parsing ────────────────────────────────────────────────

fn parse_level(input: &str) -> Result<Level, CliError> {
    Level::from_catalog(input).ok_or_else(|| CliError::Validation {
        field: "level".into(),
        reason: format!(
            "'{input}' is not a known level (expected one of: {})",
            util::join_display(Level::CATALOG)
        ),
    })
}

fn parse_category(input: &str) -> Result<Category, CliError> {
    Category::from_catalog(input).ok_or_else(|| CliError::Validation {
        field: "category".into(),
        reason: format!(
            "'{input}' is not a known category (expected one of: {})",
            util::join_display(Category::CATALOG)
        ),
    })
}

fn read_cover(path: &Path) -> Result<String, CliError> {
    Ok(cover::data_uri_from_file(path)?)
}

fn build_draft(args: CreateCourseArgs) -> Result<CourseDraft, CliError> {
    let mut draft = CourseDraft::new(args.title, args.description);
    if let Some(level) = args.level.as_deref() {
        draft.level = parse_level(level)?;
    }
    if let Some(category) = args.category.as_deref() {
        draft.category = parse_category(category)?;
    }
    draft.subcategory = args.subcategory;
    if let Some(path) = args.cover_image.as_deref() {
        draft.cover_image = read_cover(path)?;
    }
    Ok(draft)
}

fn build_patch(args: &UpdateCourseArgs) -> Result<CoursePatch, CliError> {
    let cover_image = if args.remove_cover {
        Some(String::new())
    } else {
        args.cover_image.as_deref().map(read_cover).transpose()?
    };
    Ok(CoursePatch {
        title: args.title.clone(),
        description: args.description.clone(),
        level: args.level.as_deref().map(parse_level).transpose()?,
        category: args.category.as_deref().map(parse_category).transpose()?,
        subcategory: args.subcategory.clone(),
        cover_image,
    })
}

fn print_course(course: &Course, global: &GlobalOpts) {
    let out = output::render_single(&global.output, course, detail, |c| c.id.to_string());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &CourseStore,
    args: CoursesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CoursesCommand::List => {
            let courses = store.list_mine().await?;
            if courses.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::hint(
                    "No courses yet. Create one with: coursely courses create --title <TITLE>",
                    &global.color,
                    global.quiet,
                );
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                &courses,
                |c| CourseRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CoursesCommand::Get { id } => {
            let course = store.fetch_one(&id).await?;
            print_course(&course, global);
            Ok(())
        }

        CoursesCommand::Create(create) => {
            let draft = build_draft(create)?;
            let course = store.create(&draft).await?;
            output::success(
                &format!("Course created: {}", course.id),
                &global.color,
                global.quiet,
            );
            print_course(&course, global);
            Ok(())
        }

        CoursesCommand::Update(update) => {
            let patch = build_patch(&update)?;
            let course = store.update(&update.id, &patch).await?;
            output::success(
                &format!("Course updated: {}", course.id),
                &global.color,
                global.quiet,
            );
            print_course(&course, global);
            Ok(())
        }

        CoursesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete course '{id}'? This cannot be undone."),
                "courses delete",
                global.yes,
            )? {
                return Ok(());
            }
            store.delete(&id).await?;
            output::success(
                &format!("Course deleted: {id}"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use coursely_core::normalize;
    use serde_json::json;

    use super::*;

    fn update_args(id: &str) -> UpdateCourseArgs {
        UpdateCourseArgs {
            id: id.into(),
            title: None,
            description: None,
            level: None,
            category: None,
            subcategory: None,
            cover_image: None,
            remove_cover: false,
        }
    }

    #[test]
    fn level_and_category_accept_loose_spelling() {
        assert_eq!(parse_level("advanced").unwrap(), Level::Advanced);
        assert_eq!(
            parse_category("data-science").unwrap(),
            Category::DataScience
        );
    }

    #[test]
    fn unknown_level_lists_catalog() {
        let err = parse_level("expert").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Beginner, Intermediate, Advanced"), "{msg}");
    }

    #[test]
    fn draft_defaults_match_blank_form() {
        let draft = build_draft(CreateCourseArgs {
            title: "Rust 101".into(),
            description: String::new(),
            level: None,
            category: None,
            subcategory: String::new(),
            cover_image: None,
        })
        .unwrap();
        assert_eq!(draft.level, Level::Beginner);
        assert_eq!(draft.category, Category::WebDevelopment);
        assert_eq!(draft.cover_image, "");
    }

    #[test]
    fn draft_embeds_cover_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let draft = build_draft(CreateCourseArgs {
            title: "T".into(),
            description: String::new(),
            level: Some("intermediate".into()),
            category: None,
            subcategory: String::new(),
            cover_image: Some(path),
        })
        .unwrap();
        assert!(draft.cover_image.starts_with("data:image/png;base64,"));
        assert_eq!(draft.level, Level::Intermediate);
    }

    #[test]
    fn patch_carries_only_given_fields() {
        let mut args = update_args("c1");
        args.title = Some("New".into());
        let patch = build_patch(&args).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "title": "New" })
        );
    }

    #[test]
    fn remove_cover_sends_empty_string() {
        let mut args = update_args("c1");
        args.remove_cover = true;
        let patch = build_patch(&args).unwrap();
        assert_eq!(patch.cover_image.as_deref(), Some(""));
    }

    #[test]
    fn missing_cover_file_is_validation_error() {
        let mut args = update_args("c1");
        args.cover_image = Some(PathBuf::from("/nonexistent/cover.png"));
        let err = build_patch(&args).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn detail_describes_cover_and_missing_fields() {
        let course = normalize(json!({
            "_id": "c1",
            "title": "Rust",
            "coverImage": "data:image/png;base64,AAAA"
        }))
        .unwrap();
        let text = detail(&course);
        assert!(text.contains("ID:          c1"));
        assert!(text.contains("Level:       -"));
        assert!(text.contains("image/png, 3 bytes"));
    }

    #[test]
    fn row_marks_cover_presence() {
        let course = normalize(json!({ "_id": "c2", "level": "Advanced" })).unwrap();
        let row = CourseRow::from(&course);
        assert_eq!(row.level, "Advanced");
        assert_eq!(row.cover, "");
    }
}
