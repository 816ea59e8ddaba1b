//! The closed element vocabulary of the description format.
//!
//! Every node in the tree carries an [`ElementKind`] tag. The vocabulary is
//! fixed and versioned with the format: an element name outside this set is
//! a fatal parse error, not something to skip over.
//!
//! Cross-cutting categories (registered types, callables, typed values,
//! documentation) are predicate methods on the tag rather than separate
//! trait hierarchies, so shared behavior lives in one place.

/// Kind tag for a tree node, one per element in the description format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<repository>` - root container of one document.
    Repository,
    /// `<namespace>` - named group of a library's declarations.
    Namespace,
    /// `<alias>` - registered type alias.
    Alias,
    /// `<glib:boxed>` - opaque boxed type.
    Boxed,
    /// `<class>` - instantiable object type.
    Class,
    /// `<interface>` - interface type.
    Interface,
    /// `<record>` - struct type with native layout.
    Record,
    /// `<union>` - union type.
    Union,
    /// `<enumeration>` - enumerated type.
    Enumeration,
    /// `<bitfield>` - flags type.
    Bitfield,
    /// `<callback>` - named function-pointer type.
    Callback,
    /// `<constant>` - named constant value.
    Constant,
    /// `<constructor>`.
    Constructor,
    /// `<method>`.
    Method,
    /// `<function>`.
    Function,
    /// `<virtual-method>`.
    VirtualMethod,
    /// `<glib:signal>`.
    Signal,
    /// `<property>`.
    Property,
    /// `<field>` - struct or class field.
    Field,
    /// `<member>` - enumeration or bitfield member.
    Member,
    /// `<parameters>` - parameter list container.
    Parameters,
    /// `<parameter>`.
    Parameter,
    /// `<instance-parameter>`.
    InstanceParameter,
    /// `<return-value>`.
    ReturnValue,
    /// `<type>` - unresolved type reference.
    Type,
    /// `<array>` - array type descriptor.
    Array,
    /// `<varargs>`.
    Varargs,
    /// `<implements>` - interface implemented by a class.
    Implements,
    /// `<prerequisite>` - prerequisite of an interface.
    Prerequisite,
    /// `<include>` - dependency on another document.
    Include,
    /// `<c:include>` - C header include (skipped).
    CInclude,
    /// `<package>` - pkg-config name (skipped).
    Package,
    /// `<doc>`.
    Doc,
    /// `<doc-deprecated>`.
    DocDeprecated,
    /// `<doc-version>`.
    DocVersion,
    /// `<doc-stability>`.
    DocStability,
    /// `<docsection>`.
    Docsection,
    /// `<attribute>` - free-form annotation.
    Attribute,
    /// `<source-position>`.
    SourcePosition,
    /// `<function-inline>` - inlined stand-in (skipped).
    FunctionInline,
    /// `<function-macro>` - macro stand-in (skipped).
    FunctionMacro,
    /// `<method-inline>` - inlined stand-in (skipped).
    MethodInline,
}

impl ElementKind {
    /// Look up the kind for an element name as it appears in the document.
    ///
    /// Returns `None` for names outside the closed vocabulary.
    pub fn from_name(name: &str) -> Option<ElementKind> {
        use ElementKind::*;
        Some(match name {
            "repository" => Repository,
            "namespace" => Namespace,
            "alias" => Alias,
            "glib:boxed" => Boxed,
            "class" => Class,
            "interface" => Interface,
            "record" => Record,
            "union" => Union,
            "enumeration" => Enumeration,
            "bitfield" => Bitfield,
            "callback" => Callback,
            "constant" => Constant,
            "constructor" => Constructor,
            "method" => Method,
            "function" => Function,
            "virtual-method" => VirtualMethod,
            "glib:signal" => Signal,
            "property" => Property,
            "field" => Field,
            "member" => Member,
            "parameters" => Parameters,
            "parameter" => Parameter,
            "instance-parameter" => InstanceParameter,
            "return-value" => ReturnValue,
            "type" => Type,
            "array" => Array,
            "varargs" => Varargs,
            "implements" => Implements,
            "prerequisite" => Prerequisite,
            "include" => Include,
            "c:include" => CInclude,
            "package" => Package,
            "doc" => Doc,
            "doc-deprecated" => DocDeprecated,
            "doc-version" => DocVersion,
            "doc-stability" => DocStability,
            "docsection" => Docsection,
            "attribute" => Attribute,
            "source-position" => SourcePosition,
            "function-inline" => FunctionInline,
            "function-macro" => FunctionMacro,
            "method-inline" => MethodInline,
            _ => return None,
        })
    }

    /// The element name as it appears in the document.
    pub fn name(self) -> &'static str {
        use ElementKind::*;
        match self {
            Repository => "repository",
            Namespace => "namespace",
            Alias => "alias",
            Boxed => "glib:boxed",
            Class => "class",
            Interface => "interface",
            Record => "record",
            Union => "union",
            Enumeration => "enumeration",
            Bitfield => "bitfield",
            Callback => "callback",
            Constant => "constant",
            Constructor => "constructor",
            Method => "method",
            Function => "function",
            VirtualMethod => "virtual-method",
            Signal => "glib:signal",
            Property => "property",
            Field => "field",
            Member => "member",
            Parameters => "parameters",
            Parameter => "parameter",
            InstanceParameter => "instance-parameter",
            ReturnValue => "return-value",
            Type => "type",
            Array => "array",
            Varargs => "varargs",
            Implements => "implements",
            Prerequisite => "prerequisite",
            Include => "include",
            CInclude => "c:include",
            Package => "package",
            Doc => "doc",
            DocDeprecated => "doc-deprecated",
            DocVersion => "doc-version",
            DocStability => "doc-stability",
            Docsection => "docsection",
            Attribute => "attribute",
            SourcePosition => "source-position",
            FunctionInline => "function-inline",
            FunctionMacro => "function-macro",
            MethodInline => "method-inline",
        }
    }

    // === Categories ===

    /// Declarations that introduce a named type in a namespace.
    pub fn is_registered_type(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Alias | Boxed | Class | Interface | Record | Union | Enumeration | Bitfield | Callback
        )
    }

    /// Declarations with a parameter list and a return value.
    pub fn is_callable(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Constructor | Method | Function | VirtualMethod | Signal | Callback
        )
    }

    /// Elements stamped with a platform bit at construction.
    pub fn is_multiplatform(self) -> bool {
        use ElementKind::*;
        self.is_registered_type()
            || matches!(
                self,
                Namespace | Constant | Constructor | Method | Function | VirtualMethod | Signal
                    | Property
            )
    }

    /// Elements holding a type reference or array descriptor.
    pub fn is_typed_value(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Parameter | InstanceParameter | Field | Property | ReturnValue | Constant
        )
    }

    /// Documentation elements, ignored by structural comparison.
    pub fn is_documentation(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Doc | DocDeprecated | DocVersion | DocStability | Docsection | SourcePosition
        )
    }

    /// Elements whose identity for merge matching is the declared name
    /// alone, not structural content.
    pub fn merges_by_name(self) -> bool {
        use ElementKind::*;
        self.is_registered_type() || self.is_callable() || matches!(self, Constant | Docsection)
    }

    /// Elements the parser fast-forwards past without building a node.
    pub fn is_skipped(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            CInclude | Package | FunctionInline | FunctionMacro | MethodInline
        )
    }

    /// Elements that keep their character content.
    pub fn has_text(self) -> bool {
        use ElementKind::*;
        matches!(self, Doc | DocDeprecated | DocVersion | DocStability)
    }

    /// Elements the tree-walk descends into when matching against a prior
    /// tree: namespaces and registered types. Everything else inherits the
    /// container's match context.
    pub fn is_walk_target(self) -> bool {
        self == ElementKind::Namespace || self.is_registered_type()
    }
}
