use futures::future::select_all;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

pub trait PropertyLike: Send + Sync {
    fn subscribe(&self) -> PropertySubscriber;
    fn name(&self) -> &str;
    fn debug_value(&self) -> String;
}

pub struct PropertySubscriber {
    receiver: broadcast::Receiver<()>,
}

// PropertySubscriber intentionally does not implement Clone.
// Call Property::subscribe() again for another independent subscriber.

impl PropertySubscriber {
    pub async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(_) => return true,
                // Lagged: the latest value is still readable, keep waiting for the next signal
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    pub fn try_recv(&mut self) -> bool {
        match self.receiver.try_recv() {
            Ok(_) => true,
            Err(broadcast::error::TryRecvError::Empty) => false,
            Err(broadcast::error::TryRecvError::Lagged(_)) => true,
            Err(broadcast::error::TryRecvError::Closed) => false,
        }
    }
}

/// Observable value. Readers always see the latest value; subscribers get a
/// change signal per `set`/`update`.
pub struct Property<T: Clone + Send + Sync> {
    watch_sender: Arc<watch::Sender<T>>,
    watch_receiver: watch::Receiver<T>,
    broadcast_sender: broadcast::Sender<()>,
    name: String,
}

impl<T: Clone + Send + Sync> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (watch_sender, watch_receiver) = watch::channel(initial_value);
        let (broadcast_sender, _) = broadcast::channel(100);
        Self {
            watch_sender: Arc::new(watch_sender),
            watch_receiver,
            broadcast_sender,
            name: name.into(),
        }
    }

    pub async fn get(&self) -> T {
        self.watch_receiver.borrow().clone()
    }

    /// Read without awaiting; the value lives in memory so this never blocks.
    pub fn get_sync(&self) -> T {
        self.watch_receiver.borrow().clone()
    }

    pub async fn set(&self, new_value: T) {
        self.watch_sender.send_replace(new_value);
        let _ = self.broadcast_sender.send(());
    }

    pub async fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        self.watch_sender.send_modify(updater);
        let _ = self.broadcast_sender.send(());
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        PropertySubscriber {
            receiver: self.broadcast_sender.subscribe(),
        }
    }

    /// Value-carrying receiver for consumers that want `changed().await`
    pub fn watch(&self) -> watch::Receiver<T> {
        self.watch_receiver.clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug_subscribers(&self) -> usize {
        self.broadcast_sender.receiver_count()
    }
}

impl<T: Clone + Send + Sync + PartialEq> Property<T> {
    /// Set and notify only when the value actually differs. Returns whether it changed.
    pub async fn set_if_changed(&self, new_value: T) -> bool {
        let changed = self.watch_sender.send_if_modified(|current| {
            if *current == new_value {
                false
            } else {
                *current = new_value;
                true
            }
        });
        if changed {
            let _ = self.broadcast_sender.send(());
        }
        changed
    }
}

impl<T: Clone + Send + Sync> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            watch_sender: self.watch_sender.clone(),
            watch_receiver: self.watch_receiver.clone(),
            broadcast_sender: self.broadcast_sender.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({})", self.name)
    }
}

impl<T: Clone + Send + Sync + Debug> PropertyLike for Property<T> {
    fn subscribe(&self) -> PropertySubscriber {
        self.subscribe()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn debug_value(&self) -> String {
        format!("{:?}", self.get_sync())
    }
}

/// Property recomputed whenever any dependency changes. The recompute task is
/// aborted on drop.
pub struct ComputedProperty<T: Clone + Send + Sync> {
    property: Property<T>,
    task_handle: tokio::task::JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> ComputedProperty<T> {
    pub fn new<F>(
        name: impl Into<String>,
        dependencies: Vec<Arc<dyn PropertyLike>>,
        compute: F,
    ) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let property = Property::new(compute(), name);
        let property_clone = property.clone();

        let mut subscribers: Vec<PropertySubscriber> =
            dependencies.iter().map(|dep| dep.subscribe()).collect();

        let task_handle = tokio::spawn(async move {
            if subscribers.is_empty() {
                return;
            }

            loop {
                let (changed, _, _) = select_all(
                    subscribers
                        .iter_mut()
                        .map(|subscriber| Box::pin(subscriber.wait_for_change())),
                )
                .await;

                if !changed {
                    // A dependency was dropped
                    break;
                }

                // Drain signals queued while we were waiting so one burst recomputes once
                for subscriber in &mut subscribers {
                    while subscriber.try_recv() {}
                }

                property_clone.set(compute()).await;
            }
        });

        Self {
            property,
            task_handle,
        }
    }

    pub async fn get(&self) -> T {
        self.property.get().await
    }

    pub fn get_sync(&self) -> T {
        self.property.get_sync()
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        self.property.subscribe()
    }

    pub fn debug_task_running(&self) -> bool {
        !self.task_handle.is_finished()
    }
}

impl<T: Clone + Send + Sync> Drop for ComputedProperty<T> {
    fn drop(&mut self) {
        self.task_handle.abort();
    }
}

impl<T: Clone + Send + Sync + Debug> Debug for ComputedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComputedProperty({})", self.property.name)
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Property<T> {
    /// Computed property applying `f` to this property's value
    pub fn map<U, F>(&self, f: F) -> ComputedProperty<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let self_arc: Arc<dyn PropertyLike> = Arc::new(self.clone());
        let self_clone = self.clone();

        ComputedProperty::new(format!("{}.map", self.name()), vec![self_arc], move || {
            f(self_clone.get_sync())
        })
    }
}
