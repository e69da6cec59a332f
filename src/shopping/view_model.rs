use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::intent::{Command, ShoppingIntent};
use super::reducer::ShoppingReducer;
use super::repository::ShoppingRepository;
use super::state::ShoppingUiState;
use super::subscription::Subscription;
use crate::models::{Category, ShoppingItem, SortOption};

/// Owns the list screen state and connects it to a repository.
///
/// Store snapshots and user actions both go through [`ShoppingReducer`].
/// Persistence commands are spawned and not awaited; the store's item
/// stream is what eventually brings their effect back into the state.
///
/// Must be created inside a tokio runtime.
pub struct ShoppingViewModel<R: ShoppingRepository> {
    repository: R,
    state: Arc<watch::Sender<ShoppingUiState>>,
    subscription: Subscription,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl<R: ShoppingRepository> ShoppingViewModel<R> {
    pub fn new(repository: R) -> Self {
        let (state, _) = watch::channel(ShoppingUiState::default());
        let state = Arc::new(state);

        let mut items = repository.items();
        let initial = items.borrow_and_update().clone();
        transition(&state, ShoppingIntent::ItemsLoaded(initial));

        let subscription = Subscription::start(items, {
            let state = state.clone();
            move |snapshot| {
                transition(&state, ShoppingIntent::ItemsLoaded(snapshot));
            }
        });

        Self {
            repository,
            state,
            subscription,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ShoppingUiState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every transition.
    pub fn watch(&self) -> watch::Receiver<ShoppingUiState> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, intent: ShoppingIntent) {
        if let Some(command) = transition(&self.state, intent) {
            self.execute(command);
        }
    }

    pub fn on_items_loaded(&self, items: Vec<ShoppingItem>) {
        self.dispatch(ShoppingIntent::ItemsLoaded(items));
    }

    pub fn on_item_name_change(&self, name: impl Into<String>) {
        self.dispatch(ShoppingIntent::ItemNameChanged(name.into()));
    }

    pub fn on_category_change(&self, category: Category) {
        self.dispatch(ShoppingIntent::CategoryChanged(category));
    }

    pub fn on_toggle_category_filter(&self, category: Category) {
        self.dispatch(ShoppingIntent::ToggleCategoryFilter(category));
    }

    pub fn on_clear_category_filters(&self) {
        self.dispatch(ShoppingIntent::ClearCategoryFilters);
    }

    pub fn on_sort_option_change(&self, sort_option: SortOption) {
        self.dispatch(ShoppingIntent::SortOptionChanged(sort_option));
    }

    pub fn on_show_form(&self, show: bool) {
        self.dispatch(ShoppingIntent::ShowForm(show));
    }

    pub fn on_edit_item(&self, item: ShoppingItem) {
        self.dispatch(ShoppingIntent::EditItem(item));
    }

    pub fn on_save_item(&self) {
        self.dispatch(ShoppingIntent::SaveItem);
    }

    pub fn on_update_item(&self, item: ShoppingItem) {
        self.dispatch(ShoppingIntent::UpdateItem(item));
    }

    pub fn on_delete_item(&self, item: ShoppingItem) {
        self.dispatch(ShoppingIntent::DeleteItem(item));
    }

    /// Stop reacting to store updates. Commands already issued keep running.
    pub fn unsubscribe(&mut self) {
        self.subscription.cancel();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    /// End the session: unsubscribe, then wait for issued commands to finish.
    pub async fn close(mut self) {
        self.unsubscribe();

        let pending = self
            .in_flight
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for result in futures::future::join_all(pending).await {
            if let Err(e) = result {
                tracing::warn!("Persistence task did not complete: {}", e);
            }
        }
    }

    fn execute(&self, command: Command) {
        let repository = self.repository.clone();
        tracing::debug!("Issuing {:?}", command);

        let handle = tokio::spawn(async move {
            let result = match &command {
                Command::Insert(item) => repository.insert(item.clone()).await,
                Command::Update(item) => repository.update(item.clone()).await,
                Command::Delete(item) => repository.delete(item.clone()).await,
            };
            if let Err(e) = result {
                tracing::warn!("{:?} failed: {}", command, e);
            }
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|handle| !handle.is_finished());
        in_flight.push(handle);
    }
}

/// Replace the whole state with the reducer's output in one step.
fn transition(
    state: &watch::Sender<ShoppingUiState>,
    intent: ShoppingIntent,
) -> Option<Command> {
    let mut command = None;
    state.send_modify(|current| {
        let (next, produced) = ShoppingReducer::reduce(std::mem::take(current), intent);
        *current = next;
        command = produced;
    });
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_db, ItemStore, StoreError};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    #[derive(Clone)]
    struct FakeRepository {
        items: Arc<watch::Sender<Vec<ShoppingItem>>>,
        commands: mpsc::UnboundedSender<Command>,
    }

    impl FakeRepository {
        fn new(items: Vec<ShoppingItem>) -> (Self, mpsc::UnboundedReceiver<Command>) {
            let (items, _) = watch::channel(items);
            let (commands, received) = mpsc::unbounded_channel();
            (
                Self {
                    items: Arc::new(items),
                    commands,
                },
                received,
            )
        }

        fn emit(&self, items: Vec<ShoppingItem>) {
            self.items.send_replace(items);
        }
    }

    impl ShoppingRepository for FakeRepository {
        fn items(&self) -> watch::Receiver<Vec<ShoppingItem>> {
            self.items.subscribe()
        }

        async fn insert(&self, item: ShoppingItem) -> Result<(), StoreError> {
            let _ = self.commands.send(Command::Insert(item));
            Ok(())
        }

        async fn update(&self, item: ShoppingItem) -> Result<(), StoreError> {
            let _ = self.commands.send(Command::Update(item));
            Ok(())
        }

        async fn delete(&self, item: ShoppingItem) -> Result<(), StoreError> {
            let _ = self.commands.send(Command::Delete(item));
            Ok(())
        }
    }

    fn milk() -> ShoppingItem {
        ShoppingItem::new("Milk", Category::Milk).with_id(1)
    }

    fn bread() -> ShoppingItem {
        ShoppingItem::new("Bread", Category::Breads).with_id(2)
    }

    async fn wait_until<F>(rx: &mut watch::Receiver<ShoppingUiState>, condition: F)
    where
        F: FnMut(&ShoppingUiState) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(condition))
            .await
            .expect("timed out waiting for state")
            .expect("state channel closed");
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_loaded_on_construction() {
        let (repo, _commands) = FakeRepository::new(vec![milk(), bread()]);
        let vm = ShoppingViewModel::new(repo);

        let state = vm.state();
        assert_eq!(state.items, vec![milk(), bread()]);
        assert_eq!(state.filtered_items, vec![bread(), milk()]);
        assert!(vm.is_subscribed());
    }

    #[tokio::test]
    async fn test_store_updates_flow_into_state() {
        let (repo, _commands) = FakeRepository::new(vec![]);
        let vm = ShoppingViewModel::new(repo.clone());
        vm.on_toggle_category_filter(Category::Milk);

        let mut rx = vm.watch();
        repo.emit(vec![milk(), bread()]);
        wait_until(&mut rx, |state| state.items.len() == 2).await;

        assert_eq!(vm.state().filtered_items, vec![milk()]);
    }

    #[tokio::test]
    async fn test_save_edit_issues_single_update() {
        let (repo, mut commands) = FakeRepository::new(vec![milk(), bread()]);
        let vm = ShoppingViewModel::new(repo);

        vm.on_edit_item(bread());
        vm.on_item_name_change("Whole Wheat Bread");
        vm.on_save_item();
        assert!(vm.state().item_to_edit.is_none());
        vm.close().await;

        assert_eq!(
            commands.try_recv().unwrap(),
            Command::Update(ShoppingItem::new("Whole Wheat Bread", Category::Breads).with_id(2))
        );
        assert!(commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_save_with_empty_name_issues_nothing() {
        let (repo, mut commands) = FakeRepository::new(vec![milk()]);
        let vm = ShoppingViewModel::new(repo);

        vm.on_category_change(Category::Fruits);
        vm.on_item_name_change("");
        let before = vm.state();
        vm.on_save_item();
        assert_eq!(vm.state(), before);
        vm.close().await;

        assert!(commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete_are_forwarded() {
        let (repo, mut commands) = FakeRepository::new(vec![milk()]);
        let vm = ShoppingViewModel::new(repo);

        vm.on_update_item(milk().with_completed(true));
        vm.close().await;
        assert_eq!(
            commands.try_recv().unwrap(),
            Command::Update(milk().with_completed(true))
        );

        let (repo, mut commands) = FakeRepository::new(vec![milk()]);
        let vm = ShoppingViewModel::new(repo);
        vm.on_delete_item(milk());
        vm.close().await;
        assert_eq!(commands.try_recv().unwrap(), Command::Delete(milk()));
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_item_updates() {
        let (repo, _commands) = FakeRepository::new(vec![milk()]);
        let mut vm = ShoppingViewModel::new(repo.clone());

        vm.unsubscribe();
        assert!(!vm.is_subscribed());

        repo.emit(vec![milk(), bread()]);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(vm.state().items, vec![milk()]);

        // Direct loads still work after the store stream is gone.
        vm.on_items_loaded(vec![bread()]);
        assert_eq!(vm.state().filtered_items, vec![bread()]);
    }

    #[tokio::test]
    async fn test_round_trip_through_sqlite_store() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        let store = ItemStore::open(pool).await.unwrap();
        let vm = ShoppingViewModel::new(store);
        let mut rx = vm.watch();

        vm.on_show_form(true);
        vm.on_item_name_change("Apples");
        vm.on_category_change(Category::Fruits);
        vm.on_save_item();
        assert!(!vm.state().show_form);
        wait_until(&mut rx, |state| state.filtered_items.len() == 1).await;

        let saved = vm.state().filtered_items[0].clone();
        assert!(saved.is_saved());
        assert_eq!(saved.name, "Apples");
        assert_eq!(saved.category, Category::Fruits);

        vm.on_update_item(saved.clone().with_completed(true));
        wait_until(&mut rx, |state| {
            state.items.first().is_some_and(|item| item.is_completed)
        })
        .await;

        vm.on_delete_item(saved);
        wait_until(&mut rx, |state| state.items.is_empty()).await;
        vm.close().await;
    }
}
