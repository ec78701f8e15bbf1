//! Field schema resolution.
//!
//! A destination shape describes itself through [`Shape::declare`], listing
//! which of its fields are bound to which archive entry and which sub-shapes
//! it embeds. Resolution flattens that description breadth-first into a
//! [`TypeSchema`]: bindings of embedded shapes are promoted into the parent,
//! a shallower binding shadows a deeper one with the same entry name, and
//! among bindings at the same depth the first declared one wins.
//!
//! Schemas are resolved once per shape and cached for the whole process,
//! see [`cached`].

use std::{
    any::{type_name, Any, TypeId},
    collections::{HashMap, HashSet},
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};

use crate::{codec, error::RepodataError};

/// Tag value that excludes a field from the schema.
pub const SKIP_TAG: &str = "-";

/// A destination shape with a declared binding table.
pub trait Shape: Sized + 'static {
    /// Declares the shape's bindings and embedded sub-shapes, in order.
    fn declare(schema: &mut SchemaBuilder<Self>);
}

/// Why a binding could not be applied to a destination.
pub(crate) enum Fault {
    Codec(plist::Error),
    Navigation(String),
}

impl Fault {
    pub(crate) fn into_error(self, entry: &str, path: &str) -> RepodataError {
        match self {
            Fault::Codec(source) => {
                RepodataError::Record {
                    entry: entry.to_string(),
                    path: path.to_string(),
                    source,
                }
            }
            Fault::Navigation(reason) => {
                RepodataError::Navigation {
                    entry: entry.to_string(),
                    path: path.to_string(),
                    reason,
                }
            }
        }
    }
}

type DecodeFn<T> = Arc<dyn Fn(&mut T, &[u8]) -> Result<(), Fault> + Send + Sync>;
type EncodeFn<T> = Arc<dyn Fn(&T) -> Result<Option<Vec<u8>>, plist::Error> + Send + Sync>;

/// One binding of an archive entry to a field of `T`.
pub struct FieldDescriptor<T> {
    name: String,
    path: Vec<&'static str>,
    omit_empty: bool,
    depth: usize,
    decode: DecodeFn<T>,
    encode: EncodeFn<T>,
}

impl<T> FieldDescriptor<T> {
    /// Entry name this field is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted access path from the destination root.
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    pub fn steps(&self) -> &[&'static str] {
        &self.path
    }

    /// Whether empty values are left out when encoding.
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Embedding depth the binding was declared at.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn decode_into(&self, dest: &mut T, payload: &[u8]) -> Result<(), Fault> {
        (self.decode)(dest, payload)
    }

    pub(crate) fn encode_from(&self, src: &T) -> Result<Option<Vec<u8>>, plist::Error> {
        (self.encode)(src)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("omit_empty", &self.omit_empty)
            .field("depth", &self.depth)
            .finish()
    }
}

/// Two bindings for the same entry name at the same depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub entry: String,
    pub depth: usize,
    /// Path of the binding that was kept.
    pub kept: String,
    /// Path of the binding that was dropped.
    pub dropped: String,
}

/// Flattened binding table of one shape.
pub struct TypeSchema<T> {
    shape: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    index: HashMap<String, usize>,
    conflicts: Vec<Conflict>,
}

impl<T> TypeSchema<T> {
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    /// Bindings in resolution order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Looks up the binding for an entry name. Matching is exact.
    pub fn lookup(&self, entry: &str) -> Option<&FieldDescriptor<T>> {
        self.index.get(entry).map(|&i| &self.fields[i])
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for TypeSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSchema")
            .field("shape", &self.shape)
            .field("fields", &self.fields)
            .field("conflicts", &self.conflicts)
            .finish()
    }
}

/// How an embedded sub-shape is held by its parent.
enum Holder<P, C> {
    Owned {
        get_mut: fn(&mut P) -> &mut C,
        get: fn(&P) -> &C,
    },
    Boxed {
        get_mut: fn(&mut P) -> &mut Option<Box<C>>,
        get: fn(&P) -> &Option<Box<C>>,
        alloc: fn() -> Box<C>,
    },
    Shared {
        get_mut: fn(&mut P) -> &mut Arc<C>,
        get: fn(&P) -> &Arc<C>,
    },
}

impl<P, C> Clone for Holder<P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for Holder<P, C> {}

impl<P, C> Holder<P, C> {
    /// Enters the holder for writing, allocating empty optional holders.
    fn enter<'a>(&self, parent: &'a mut P) -> Result<&'a mut C, String> {
        match *self {
            Holder::Owned { get_mut, .. } => Ok(get_mut(parent)),
            Holder::Boxed { get_mut, alloc, .. } => {
                let boxed = get_mut(parent).get_or_insert_with(alloc);
                Ok(&mut **boxed)
            }
            Holder::Shared { get_mut, .. } => {
                Arc::get_mut(get_mut(parent))
                    .ok_or_else(|| "shared value is referenced elsewhere".to_string())
            }
        }
    }

    fn view<'a>(&self, parent: &'a P) -> Option<&'a C> {
        match *self {
            Holder::Owned { get, .. } => Some(get(parent)),
            Holder::Boxed { get, .. } => get(parent).as_deref(),
            Holder::Shared { get, .. } => Some(&**get(parent)),
        }
    }
}

struct Embed<T> {
    type_id: TypeId,
    type_name: &'static str,
    path: Vec<&'static str>,
    expand: Arc<dyn Fn() -> Vec<Declaration<T>> + Send + Sync>,
}

enum Declaration<T> {
    Field(FieldDescriptor<T>),
    Embed(Embed<T>),
}

/// Rebases a declaration of `C` onto `P` through `holder`.
fn lift<P: 'static, C: 'static>(
    declaration: Declaration<C>,
    segment: &'static str,
    holder: Holder<P, C>,
) -> Declaration<P> {
    match declaration {
        Declaration::Field(field) => {
            let mut path = vec![segment];
            path.extend(field.path);
            let decode = field.decode;
            let encode = field.encode;
            Declaration::Field(FieldDescriptor {
                name: field.name,
                path,
                omit_empty: field.omit_empty,
                depth: field.depth,
                decode: Arc::new(move |parent: &mut P, payload: &[u8]| {
                    let child = holder.enter(parent).map_err(Fault::Navigation)?;
                    decode(child, payload)
                }),
                encode: Arc::new(move |parent: &P| {
                    match holder.view(parent) {
                        Some(child) => encode(child),
                        None => Ok(None),
                    }
                }),
            })
        }
        Declaration::Embed(embed) => {
            let mut path = vec![segment];
            path.extend(embed.path);
            let expand = embed.expand;
            Declaration::Embed(Embed {
                type_id: embed.type_id,
                type_name: embed.type_name,
                path,
                expand: Arc::new(move || {
                    expand()
                        .into_iter()
                        .map(|declaration| lift(declaration, segment, holder))
                        .collect::<Vec<_>>()
                }),
            })
        }
    }
}

/// A parsed binding tag: `entry-name[,option,...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub omit_empty: bool,
}

impl Tag {
    /// Parses a binding tag.
    ///
    /// Returns `None` for the exclusion sentinel `-` and for tags without an
    /// entry name. Unknown options are ignored.
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == SKIP_TAG {
            return None;
        }
        let mut parts = tag.split(',');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return None;
        }
        let omit_empty = parts.any(|opt| opt.trim() == "omitempty");
        Some(Self {
            name: name.to_string(),
            omit_empty,
        })
    }
}

/// Collects the binding table of a single shape.
pub struct SchemaBuilder<T> {
    declarations: Vec<Declaration<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    fn push_field<V, G>(
        &mut self,
        tag: &str,
        name: &'static str,
        decode: DecodeFn<T>,
        get: G,
    ) -> &mut Self
    where
        V: Serialize + Default + PartialEq + 'static,
        G: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        let Some(tag) = Tag::parse(tag) else {
            trace!(field = name, "field excluded from schema");
            return self;
        };
        let omit_empty = tag.omit_empty;
        self.declarations.push(Declaration::Field(FieldDescriptor {
            name: tag.name,
            path: vec![name],
            omit_empty,
            depth: 0,
            decode,
            encode: Arc::new(move |src: &T| {
                match get(src) {
                    Some(value) if omit_empty && *value == V::default() => Ok(None),
                    Some(value) => codec::encode_record(value).map(Some),
                    None => Ok(None),
                }
            }),
        }));
        self
    }

    /// Binds a field to the entry named by `tag`.
    ///
    /// The entry payload replaces the field's value. Maps are decoded as a
    /// whole, and a pre-populated struct value is reset rather than merged.
    pub fn field<V>(
        &mut self,
        tag: &str,
        name: &'static str,
        get_mut: fn(&mut T) -> &mut V,
        get: fn(&T) -> &V,
    ) -> &mut Self
    where
        V: DeserializeOwned + Serialize + Default + PartialEq + 'static,
    {
        let decode: DecodeFn<T> = Arc::new(move |dest: &mut T, payload: &[u8]| {
            *get_mut(dest) = codec::decode_record(payload).map_err(Fault::Codec)?;
            Ok(())
        });
        self.push_field(tag, name, decode, move |src: &T| Some(get(src)))
    }

    /// Binds an optional field; a decoded entry always sets it to `Some`.
    ///
    /// An existing `Some` value is replaced, not merged with the payload.
    pub fn optional<V>(
        &mut self,
        tag: &str,
        name: &'static str,
        get_mut: fn(&mut T) -> &mut Option<V>,
        get: fn(&T) -> &Option<V>,
    ) -> &mut Self
    where
        V: DeserializeOwned + Serialize + Default + PartialEq + 'static,
    {
        let decode: DecodeFn<T> = Arc::new(move |dest: &mut T, payload: &[u8]| {
            *get_mut(dest) = Some(codec::decode_record(payload).map_err(Fault::Codec)?);
            Ok(())
        });
        self.push_field(tag, name, decode, move |src: &T| get(src).as_ref())
    }

    fn push_embed<C: Shape>(&mut self, name: &'static str, holder: Holder<T, C>) -> &mut Self {
        self.declarations.push(Declaration::Embed(Embed {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            path: Vec::new(),
            expand: Arc::new(move || {
                let mut child = SchemaBuilder::<C>::new();
                C::declare(&mut child);
                child
                    .declarations
                    .into_iter()
                    .map(|declaration| lift(declaration, name, holder))
                    .collect::<Vec<_>>()
            }),
        }));
        self
    }

    /// Embeds an owned sub-shape; its bindings are promoted into `T`.
    pub fn embed<C: Shape>(
        &mut self,
        name: &'static str,
        get_mut: fn(&mut T) -> &mut C,
        get: fn(&T) -> &C,
    ) -> &mut Self {
        self.push_embed(
            name,
            Holder::Owned {
                get_mut,
                get,
            },
        )
    }

    /// Embeds a boxed sub-shape that is allocated when first written to.
    pub fn embed_optional<C: Shape + Default>(
        &mut self,
        name: &'static str,
        get_mut: fn(&mut T) -> &mut Option<Box<C>>,
        get: fn(&T) -> &Option<Box<C>>,
    ) -> &mut Self {
        self.push_embed(
            name,
            Holder::Boxed {
                get_mut,
                get,
                alloc: Box::default,
            },
        )
    }

    /// Embeds a shared sub-shape. Decoding into it fails unless the parent
    /// holds the only reference.
    pub fn embed_shared<C: Shape>(
        &mut self,
        name: &'static str,
        get_mut: fn(&mut T) -> &mut Arc<C>,
        get: fn(&T) -> &Arc<C>,
    ) -> &mut Self {
        self.push_embed(
            name,
            Holder::Shared {
                get_mut,
                get,
            },
        )
    }
}

/// Resolves the schema of `T` without consulting the cache.
pub fn resolve<T: Shape>() -> TypeSchema<T> {
    let shape = type_name::<T>();
    let mut root = SchemaBuilder::<T>::new();
    T::declare(&mut root);

    let mut visited = HashSet::from([TypeId::of::<T>()]);
    let mut fields: Vec<FieldDescriptor<T>> = Vec::new();
    let mut index = HashMap::new();
    let mut conflicts = Vec::new();

    let mut current = root.declarations;
    let mut depth = 0;
    while !current.is_empty() {
        let mut embedded = Vec::new();
        for declaration in current {
            match declaration {
                Declaration::Field(mut field) => {
                    field.depth = depth;
                    match index.get(&field.name).copied() {
                        None => {
                            index.insert(field.name.clone(), fields.len());
                            fields.push(field);
                        }
                        Some(kept) if fields[kept].depth == depth => {
                            let conflict = Conflict {
                                entry: field.name.clone(),
                                depth,
                                kept: fields[kept].path(),
                                dropped: field.path(),
                            };
                            debug!(
                                shape,
                                entry = %conflict.entry,
                                kept = %conflict.kept,
                                dropped = %conflict.dropped,
                                "conflicting bindings at the same depth, keeping the first"
                            );
                            conflicts.push(conflict);
                        }
                        Some(kept) => {
                            trace!(
                                shape,
                                entry = %field.name,
                                kept = %fields[kept].path(),
                                shadowed = %field.path(),
                                "binding shadowed by a shallower field"
                            );
                        }
                    }
                }
                Declaration::Embed(embed) => embedded.push(embed),
            }
        }

        current = Vec::new();
        for embed in embedded {
            if visited.insert(embed.type_id) {
                current.extend((embed.expand)());
            } else {
                trace!(
                    shape,
                    embedded = embed.type_name,
                    path = %embed.path.join("."),
                    "shape already traversed"
                );
            }
        }
        depth += 1;
    }

    debug!(shape, bindings = fields.len(), "resolved schema");
    TypeSchema {
        shape,
        fields,
        index,
        conflicts,
    }
}

type CachedSchema = Arc<dyn Any + Send + Sync>;

static SCHEMA_CACHE: Lazy<RwLock<HashMap<TypeId, CachedSchema>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the schema of `T`, resolving it on first use.
///
/// Concurrent first uses may each resolve the schema, but only the first
/// stored result is ever returned.
pub fn cached<T: Shape>() -> Arc<TypeSchema<T>> {
    let key = TypeId::of::<T>();
    {
        let cache = SCHEMA_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(schema) = cache.get(&key).cloned() {
            if let Ok(schema) = schema.downcast::<TypeSchema<T>>() {
                return schema;
            }
        }
    }

    let computed = Arc::new(resolve::<T>());
    let erased: CachedSchema = computed.clone();
    let stored = SCHEMA_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert(erased)
        .clone();
    stored.downcast::<TypeSchema<T>>().unwrap_or(computed)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test_utils::to_plist;

    #[derive(Default)]
    struct Leafy {
        a: String,
        b: Vec<String>,
        hidden: String,
    }

    impl Shape for Leafy {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("a.plist", "a", |s| &mut s.a, |s| &s.a)
                .field("b.plist,omitempty", "b", |s| &mut s.b, |s| &s.b)
                .field(SKIP_TAG, "hidden", |s| &mut s.hidden, |s| &s.hidden);
        }
    }

    #[derive(Default)]
    struct Inner {
        c: String,
        a: String,
    }

    impl Shape for Inner {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("c.plist", "c", |s| &mut s.c, |s| &s.c)
                .field("a.plist", "a", |s| &mut s.a, |s| &s.a);
        }
    }

    #[derive(Default)]
    struct Outer {
        a: String,
        inner: Inner,
        boxed: Option<Box<Deep>>,
    }

    impl Shape for Outer {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("a.plist", "a", |s| &mut s.a, |s| &s.a)
                .embed("inner", |s| &mut s.inner, |s| &s.inner)
                .embed_optional("boxed", |s| &mut s.boxed, |s| &s.boxed);
        }
    }

    #[derive(Default)]
    struct Deep {
        d: BTreeMap<String, String>,
        node: Option<Box<Node>>,
    }

    impl Shape for Deep {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("d.plist", "d", |s| &mut s.d, |s| &s.d)
                .embed_optional("node", |s| &mut s.node, |s| &s.node);
        }
    }

    #[derive(Default)]
    struct Node {
        value: String,
        next: Option<Box<Node>>,
    }

    impl Shape for Node {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("node.plist", "value", |s| &mut s.value, |s| &s.value)
                .embed_optional("next", |s| &mut s.next, |s| &s.next);
        }
    }

    #[derive(Default)]
    struct Twin {
        left: String,
        right: String,
    }

    impl Shape for Twin {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("same.plist", "left", |s| &mut s.left, |s| &s.left)
                .field("same.plist", "right", |s| &mut s.right, |s| &s.right);
        }
    }

    struct SharedHolder {
        shared: Arc<Leafy>,
    }

    impl Shape for SharedHolder {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema.embed_shared("shared", |s| &mut s.shared, |s| &s.shared);
        }
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            Tag::parse("index.plist"),
            Some(Tag {
                name: "index.plist".into(),
                omit_empty: false
            })
        );
        assert_eq!(
            Tag::parse("stage.plist,omitempty"),
            Some(Tag {
                name: "stage.plist".into(),
                omit_empty: true
            })
        );
        assert_eq!(
            Tag::parse("x.plist,unknown"),
            Some(Tag {
                name: "x.plist".into(),
                omit_empty: false
            })
        );
        assert_eq!(Tag::parse("-"), None);
        assert_eq!(Tag::parse(""), None);
        assert_eq!(Tag::parse(",omitempty"), None);
    }

    #[test]
    fn test_excluded_fields_are_dropped() {
        let schema = resolve::<Leafy>();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.plist", "b.plist"]);
        assert!(!schema.fields()[0].omit_empty());
        assert!(schema.fields()[1].omit_empty());
    }

    #[test]
    fn test_embedded_fields_are_promoted() {
        let schema = resolve::<Outer>();
        let bindings: Vec<_> = schema
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), f.path(), f.depth()))
            .collect();
        assert_eq!(
            bindings,
            vec![
                ("a.plist".to_string(), "a".to_string(), 0),
                ("c.plist".to_string(), "inner.c".to_string(), 1),
                ("d.plist".to_string(), "boxed.d".to_string(), 1),
                ("node.plist".to_string(), "boxed.node.value".to_string(), 2),
            ]
        );
        assert!(schema.conflicts().is_empty());
    }

    #[test]
    fn test_shallower_binding_wins() {
        let schema = resolve::<Outer>();
        assert_eq!(schema.lookup("a.plist").unwrap().path(), "a");
    }

    #[test]
    fn test_self_reference_terminates() {
        let schema = resolve::<Node>();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.lookup("node.plist").unwrap().path(), "value");
    }

    #[test]
    fn test_same_depth_conflict_keeps_first() {
        let schema = resolve::<Twin>();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.lookup("same.plist").unwrap().path(), "left");
        assert_eq!(
            schema.conflicts(),
            &[Conflict {
                entry: "same.plist".into(),
                depth: 0,
                kept: "left".into(),
                dropped: "right".into(),
            }]
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let schema = resolve::<Leafy>();
        assert!(schema.lookup("a.plist").is_some());
        assert!(schema.lookup("./a.plist").is_none());
        assert!(schema.lookup("a").is_none());
        assert!(schema.lookup("A.plist").is_none());
    }

    #[test]
    fn test_decode_allocates_boxed_holders() {
        let schema = resolve::<Outer>();
        let mut outer = Outer::default();
        let payload = to_plist(&"deep".to_string());
        let field = schema.lookup("node.plist").unwrap();
        assert!(field.decode_into(&mut outer, &payload).is_ok());

        let node = outer.boxed.as_ref().unwrap().node.as_ref().unwrap();
        assert_eq!(node.value, "deep");
        assert!(node.next.is_none());
    }

    #[test]
    fn test_shared_holder_must_be_unique() {
        let schema = resolve::<SharedHolder>();
        let payload = to_plist(&"value".to_string());
        let field = schema.lookup("a.plist").unwrap();

        let mut unique = SharedHolder {
            shared: Arc::new(Leafy::default()),
        };
        assert!(field.decode_into(&mut unique, &payload).is_ok());
        assert_eq!(unique.shared.a, "value");

        let mut aliased = SharedHolder {
            shared: Arc::new(Leafy::default()),
        };
        let _other = Arc::clone(&aliased.shared);
        let fault = field.decode_into(&mut aliased, &payload).err().unwrap();
        let err = fault.into_error("a.plist", &field.path());
        assert!(matches!(err, RepodataError::Navigation { ref path, .. } if path == "shared.a"));
    }

    #[test]
    fn test_encode_omits_empty_values() {
        let schema = resolve::<Leafy>();
        let leafy = Leafy::default();
        assert!(schema.fields()[0].encode_from(&leafy).unwrap().is_some());
        assert!(schema.fields()[1].encode_from(&leafy).unwrap().is_none());

        let outer = Outer::default();
        let schema = resolve::<Outer>();
        assert!(schema
            .lookup("d.plist")
            .unwrap()
            .encode_from(&outer)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_cached_resolves_once() {
        let first = cached::<Outer>();
        let second = cached::<Outer>();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cached_concurrent_first_use() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(cached::<Deep>))
            .collect();
        let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for schema in &schemas[1..] {
            assert!(Arc::ptr_eq(&schemas[0], schema));
        }
        assert_eq!(schemas[0].len(), 2);
    }
}
