use std::time::Duration;

pub use k8s_openapi as openapi;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub use time::TimeExt;

mod time;

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self;
    fn created(self, ts: impl Into<Option<metav1::Time>>) -> Self;
    fn label(self, key: impl ToString, value: impl ToString) -> Self;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }

    fn created(self, ts: impl Into<Option<metav1::Time>>) -> Self {
        Self {
            creation_timestamp: ts.into(),
            ..self
        }
    }

    fn label(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.labels
            .get_or_insert_with(default)
            .insert(key.to_string(), value.to_string());
        self
    }
}

pub trait NodeExt {
    fn new(name: impl ToString) -> Self;
    fn labelled(self, key: impl ToString, value: impl ToString) -> Self;
    fn created(self, ts: impl Into<Option<metav1::Time>>) -> Self;
    fn provider(self, provider_id: impl ToString) -> Self;
    fn cordoned(self) -> Self;

    /// True when the node carries `key` among its labels, whatever the value.
    fn has_label(&self, key: &str) -> bool;
    fn creation_time(&self) -> Option<&metav1::Time>;
    fn is_unschedulable(&self) -> bool;
    fn provider_id(&self) -> Option<&str>;

    /// Age of the node as seen at `now`, `None` without a creation timestamp.
    fn age_at(&self, now: &metav1::Time) -> Option<Duration> {
        self.creation_time().map(|created| created.age_at(now))
    }
}

impl NodeExt for corev1::Node {
    fn new(name: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::new(name);
        Self {
            metadata,
            ..default()
        }
    }

    fn labelled(self, key: impl ToString, value: impl ToString) -> Self {
        Self {
            metadata: self.metadata.label(key, value),
            ..self
        }
    }

    fn created(self, ts: impl Into<Option<metav1::Time>>) -> Self {
        Self {
            metadata: self.metadata.created(ts),
            ..self
        }
    }

    fn provider(mut self, provider_id: impl ToString) -> Self {
        self.spec.get_or_insert_with(default).provider_id = Some(provider_id.to_string());
        self
    }

    fn cordoned(mut self) -> Self {
        self.spec.get_or_insert_with(default).unschedulable = Some(true);
        self
    }

    fn has_label(&self, key: &str) -> bool {
        self.metadata
            .labels
            .as_ref()
            .is_some_and(|labels| labels.contains_key(key))
    }

    fn creation_time(&self) -> Option<&metav1::Time> {
        self.metadata.creation_timestamp.as_ref()
    }

    fn is_unschedulable(&self) -> bool {
        self.spec
            .as_ref()
            .and_then(|spec| spec.unschedulable)
            .unwrap_or_default()
    }

    fn provider_id(&self) -> Option<&str> {
        self.spec.as_ref()?.provider_id.as_deref()
    }
}

pub trait PodExt {
    fn new(name: impl ToString, namespace: impl ToString) -> Self;
    fn on_node(self, node: impl ToString) -> Self;
    fn assigned_node(&self) -> Option<&str>;
}

impl PodExt for corev1::Pod {
    fn new(name: impl ToString, namespace: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::with_namespace(name, namespace);
        Self {
            metadata,
            ..default()
        }
    }

    fn on_node(mut self, node: impl ToString) -> Self {
        self.spec.get_or_insert_with(default).node_name = Some(node.to_string());
        self
    }

    fn assigned_node(&self) -> Option<&str> {
        self.spec.as_ref()?.node_name.as_deref()
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}

#[cfg(test)]
mod tests;
