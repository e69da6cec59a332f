use clap::{Subcommand, ValueEnum};
use std::collections::BTreeSet;

use shoplist::config::Config;
use shoplist::{Category, ItemStore, ShoppingItem, ShoppingViewModel, SortOption};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Show the grocery list
    List {
        /// Sort order: alphabetical, category or status
        #[arg(long, short)]
        sort: Option<SortOption>,

        /// Only show these categories (can be repeated)
        #[arg(long = "category", short = 'C', value_name = "CATEGORY")]
        categories: Vec<Category>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an item
    Add {
        /// Item name
        name: String,

        /// Category: Milk, Vegetables, Fruits, Breads or Meats
        #[arg(long = "category", short = 'C', default_value = "Milk")]
        category: Category,
    },

    /// Rename an item or move it to another category
    Edit {
        /// Item ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New category
        #[arg(long = "category", short = 'C')]
        category: Option<Category>,
    },

    /// Mark an item as bought
    Check {
        /// Item ID
        id: i64,
    },

    /// Mark an item as not bought yet
    Uncheck {
        /// Item ID
        id: i64,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: i64,
    },
}

impl ItemSubcommand {
    /// Translate the command into view model actions.
    ///
    /// Writes are only issued here; the caller closes the view model to
    /// wait for them.
    pub fn run(
        &self,
        vm: &ShoppingViewModel<ItemStore>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            ItemSubcommand::List {
                sort,
                categories,
                format,
            } => {
                vm.on_sort_option_change(sort.unwrap_or(config.default_sort.value));
                let selected: BTreeSet<Category> = categories.iter().copied().collect();
                for category in selected {
                    vm.on_toggle_category_filter(category);
                }

                let state = vm.state();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&state.filtered_items)?);
                    }
                    OutputFormat::Text => {
                        println!("Grocery List - sorted {}", state.sort_option.label());
                        println!("Filter: {}", format_filter(&state.selected_categories));
                        println!("{}", "=".repeat(44));

                        if state.filtered_items.is_empty() {
                            println!("No items.");
                        } else {
                            for item in &state.filtered_items {
                                println!("{}", item);
                            }
                        }
                    }
                }
                Ok(())
            }
            ItemSubcommand::Add { name, category } => {
                if name.is_empty() {
                    return Err("Item name cannot be empty".into());
                }

                vm.on_show_form(true);
                vm.on_item_name_change(name.as_str());
                vm.on_category_change(*category);
                vm.on_save_item();
                println!("Added {} ({})", name, category);
                Ok(())
            }
            ItemSubcommand::Edit { id, name, category } => {
                let item = find_item(vm, *id)?;
                if name.as_deref() == Some("") {
                    return Err("Item name cannot be empty".into());
                }

                vm.on_edit_item(item);
                if let Some(name) = name {
                    vm.on_item_name_change(name.as_str());
                }
                if let Some(category) = category {
                    vm.on_category_change(*category);
                }
                vm.on_save_item();
                println!("Updated item {}", id);
                Ok(())
            }
            ItemSubcommand::Check { id } => {
                let item = find_item(vm, *id)?;
                println!("Checked {}", item.name);
                vm.on_update_item(item.with_completed(true));
                Ok(())
            }
            ItemSubcommand::Uncheck { id } => {
                let item = find_item(vm, *id)?;
                println!("Unchecked {}", item.name);
                vm.on_update_item(item.with_completed(false));
                Ok(())
            }
            ItemSubcommand::Delete { id } => {
                let item = find_item(vm, *id)?;
                println!("Deleted {}", item.name);
                vm.on_delete_item(item);
                Ok(())
            }
        }
    }
}

fn find_item(
    vm: &ShoppingViewModel<ItemStore>,
    id: i64,
) -> Result<ShoppingItem, Box<dyn std::error::Error>> {
    vm.state()
        .find_item(id)
        .cloned()
        .ok_or_else(|| format!("No item with id {}", id).into())
}

fn format_filter(selected: &BTreeSet<Category>) -> String {
    if selected.is_empty() {
        return "All".to_string();
    }
    selected
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoplist::config::{ConfigSource, ConfigValue};
    use shoplist::init_db;
    use tempfile::TempDir;

    struct TestContext {
        store: ItemStore,
        config: Config,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        TestContext {
            store: ItemStore::open(pool).await.unwrap(),
            config: Config {
                database_path: ConfigValue::new(db_path, ConfigSource::Default),
                default_sort: ConfigValue::new(SortOption::Alphabetical, ConfigSource::Default),
                config_file: None,
            },
            _temp_dir: temp_dir,
        }
    }

    async fn run(ctx: &TestContext, command: ItemSubcommand) -> Result<(), String> {
        let vm = ShoppingViewModel::new(ctx.store.clone());
        let result = command.run(&vm, &ctx.config).map_err(|e| e.to_string());
        vm.close().await;
        result
    }

    async fn stored(ctx: &TestContext, id: i64) -> ShoppingItem {
        ctx.store
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|item| item.id == id)
            .unwrap()
    }

    #[test]
    fn test_format_filter() {
        assert_eq!(format_filter(&BTreeSet::new()), "All");
        assert_eq!(
            format_filter(&BTreeSet::from([Category::Breads, Category::Milk])),
            "Milk, Breads"
        );
    }

    #[tokio::test]
    async fn test_add_check_edit_delete() {
        let ctx = setup().await;

        run(
            &ctx,
            ItemSubcommand::Add {
                name: "Bread".to_string(),
                category: Category::Breads,
            },
        )
        .await
        .unwrap();
        let items = ctx.store.list().await.unwrap();
        assert_eq!(items.len(), 1);
        let id = items[0].id;

        run(&ctx, ItemSubcommand::Check { id }).await.unwrap();
        assert!(stored(&ctx, id).await.is_completed);

        run(
            &ctx,
            ItemSubcommand::Edit {
                id,
                name: Some("Whole Wheat Bread".to_string()),
                category: None,
            },
        )
        .await
        .unwrap();
        let edited = stored(&ctx, id).await;
        assert_eq!(edited.name, "Whole Wheat Bread");
        assert_eq!(edited.category, Category::Breads);
        assert!(edited.is_completed);

        run(&ctx, ItemSubcommand::Delete { id }).await.unwrap();
        assert!(ctx.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_reported() {
        let ctx = setup().await;
        let err = run(&ctx, ItemSubcommand::Check { id: 42 })
            .await
            .unwrap_err();
        assert_eq!(err, "No item with id 42");
    }

    #[tokio::test]
    async fn test_add_rejects_empty_name() {
        let ctx = setup().await;
        let err = run(
            &ctx,
            ItemSubcommand::Add {
                name: String::new(),
                category: Category::Milk,
            },
        )
        .await
        .unwrap_err();
        assert!(err.contains("cannot be empty"));
        assert!(ctx.store.list().await.unwrap().is_empty());
    }
}
