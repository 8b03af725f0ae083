//! Integration tests for the registry binding algorithm.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gallium_cmd::{
    convert, AmbientArgs, ArgValue, Args, Command, CommandDef, CommandError, CommandResult,
    Environment, InvokeError, Param, Permission, Registry,
};

/// Environment that records output and answers permission checks from a
/// fixed level.
struct TestEnv {
    sent: Vec<String>,
    granted: Permission,
}

impl TestEnv {
    fn anyone() -> Self {
        TestEnv {
            sent: Vec::new(),
            granted: Permission::Anyone,
        }
    }

    fn owner() -> Self {
        TestEnv {
            sent: Vec::new(),
            granted: Permission::Owner,
        }
    }
}

#[async_trait]
impl Environment for TestEnv {
    async fn output(&mut self, text: &str) -> CommandResult {
        self.sent.push(text.to_owned());
        Ok(())
    }

    async fn check_permission(&self, level: Permission) -> bool {
        match level {
            Permission::Nobody => false,
            Permission::Anyone => true,
            Permission::ListedAdmin | Permission::Owner => self.granted == Permission::Owner,
        }
    }
}

/// Command that captures the bound arguments for inspection.
struct Capture {
    def: fn() -> CommandDef,
    seen: Arc<Mutex<Vec<Args>>>,
}

#[async_trait]
impl Command for Capture {
    fn def(&self) -> CommandDef {
        (self.def)()
    }

    async fn run(&self, args: Args, _env: &mut dyn Environment) -> CommandResult {
        self.seen.lock().unwrap().push(args);
        Ok(())
    }
}

fn registry_with(def: fn() -> CommandDef) -> (Registry, Arc<Mutex<Vec<Args>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut registry = Registry::new();
    registry
        .register(Box::new(Capture {
            def,
            seen: seen.clone(),
        }))
        .unwrap();
    (registry, seen)
}

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| (*t).to_owned()).collect()
}

fn frob_def() -> CommandDef {
    CommandDef::new("foo")
        .describe("Test the binder")
        .permission(Permission::Anyone)
        .param(Param::switch("frob"))
        .param(Param::named("garble", convert::string))
}

fn two_positionals_def() -> CommandDef {
    CommandDef::new("pair")
        .permission(Permission::Anyone)
        .param(Param::positional(0, "a", convert::string))
        .param(Param::positional(1, "b", convert::string))
}

#[tokio::test]
async fn test_switch_and_named_bind() {
    let (registry, seen) = registry_with(frob_def);
    let mut env = TestEnv::anyone();
    registry
        .invoke("foo", &argv(&["--frob", "--garble", "value"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert!(seen[0].flag("frob"));
    assert_eq!(seen[0].str("garble"), Some("value"));
}

#[tokio::test]
async fn test_named_without_value_is_badparam() {
    let (registry, _) = registry_with(frob_def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("foo", &argv(&["--garble"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    match err {
        InvokeError::BadParam { name, .. } => assert_eq!(name, "garble"),
        other => panic!("expected BadParam, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_option_is_noparam() {
    let (registry, _) = registry_with(frob_def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("foo", &argv(&["--mystery"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    match err {
        InvokeError::NoParam { name, .. } => assert_eq!(name, "mystery"),
        other => panic!("expected NoParam, got {other:?}"),
    }
}

#[tokio::test]
async fn test_positionals_bind_lowest_index_first() {
    let (registry, seen) = registry_with(two_positionals_def);
    let mut env = TestEnv::anyone();
    registry
        .invoke("pair", &argv(&["x", "y"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].str("a"), Some("x"));
    assert_eq!(seen[0].str("b"), Some("y"));
}

#[tokio::test]
async fn test_surplus_positionals_are_skipped() {
    // The binder ignores extra positional tokens rather than failing.
    let (registry, seen) = registry_with(two_positionals_def);
    let mut env = TestEnv::anyone();
    registry
        .invoke("pair", &argv(&["x", "y", "z"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].str("a"), Some("x"));
    assert_eq!(seen[0].str("b"), Some("y"));
}

#[tokio::test]
async fn test_double_dash_disables_named_parsing() {
    let (registry, seen) = registry_with(two_positionals_def);
    let mut env = TestEnv::anyone();
    registry
        .invoke("pair", &argv(&["--", "--frob", "y"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].str("a"), Some("--frob"));
    assert_eq!(seen[0].str("b"), Some("y"));
}

#[tokio::test]
async fn test_positional_by_name_is_badparam() {
    let (registry, _) = registry_with(two_positionals_def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("pair", &argv(&["--a", "x"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    match err {
        InvokeError::BadParam { name, .. } => assert_eq!(name, "a"),
        other => panic!("expected BadParam, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_required_positional_is_noparam() {
    let (registry, _) = registry_with(two_positionals_def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("pair", &argv(&["x"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    match err {
        InvokeError::NoParam { name, .. } => assert_eq!(name, "b"),
        other => panic!("expected NoParam, got {other:?}"),
    }
}

#[tokio::test]
async fn test_case_insensitive_lookup() {
    fn def() -> CommandDef {
        CommandDef::new("Embed").permission(Permission::Anyone)
    }
    let (registry, _) = registry_with(def);
    let mut env = TestEnv::anyone();
    for name in ["embed", "EMBED", "EmBeD"] {
        registry
            .invoke(name, &[], &AmbientArgs::new(), &mut env)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_unknown_command_is_nocommand() {
    let registry = Registry::new();
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("nope", &[], &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::NoCommand));
}

static SPY_CALLS: AtomicUsize = AtomicUsize::new(0);

fn spy_converter(raw: &str) -> Result<ArgValue, String> {
    SPY_CALLS.fetch_add(1, Ordering::SeqCst);
    Ok(ArgValue::Str(raw.to_owned()))
}

#[tokio::test]
async fn test_permission_denied_short_circuits_binding() {
    fn def() -> CommandDef {
        CommandDef::new("secret")
            .permission(Permission::Owner)
            .param(Param::positional(0, "what", spy_converter))
    }
    let (registry, _) = registry_with(def);

    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("secret", &argv(&["payload"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::NoPermission));
    assert_eq!(SPY_CALLS.load(Ordering::SeqCst), 0, "converter ran before the permission check");

    let mut env = TestEnv::owner();
    registry
        .invoke("secret", &argv(&["payload"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap();
    assert_eq!(SPY_CALLS.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_predicate_permission() {
    fn def() -> CommandDef {
        CommandDef::new("guarded")
            .permission_check(|_name, argv| argv.first().is_some_and(|a| a == "sesame"))
            .param(Param::positional(0, "word", convert::string))
    }
    let (registry, _) = registry_with(def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("guarded", &argv(&["nope"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::NoPermission));
    registry
        .invoke("guarded", &argv(&["sesame"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_converter_failure_message_propagates() {
    fn def() -> CommandDef {
        CommandDef::new("count")
            .permission(Permission::Anyone)
            .param(Param::positional(0, "n", convert::int))
    }
    let (registry, _) = registry_with(def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("count", &argv(&["elephant"]), &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    match err {
        InvokeError::BadParam { name, message } => {
            assert_eq!(name, "n");
            assert_eq!(message, "Must be an integer.");
        }
        other => panic!("expected BadParam, got {other:?}"),
    }
}

#[tokio::test]
async fn test_repeating_named_appends() {
    fn def() -> CommandDef {
        CommandDef::new("tags")
            .permission(Permission::Anyone)
            .param(Param::named("tag", convert::string).repeating())
    }
    let (registry, seen) = registry_with(def);
    let mut env = TestEnv::anyone();
    registry
        .invoke(
            "tags",
            &argv(&["--tag", "a", "--tag", "b"]),
            &AmbientArgs::new(),
            &mut env,
        )
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].many("tag").unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_repeating_named_overwrites() {
    let (registry, seen) = registry_with(frob_def);
    let mut env = TestEnv::anyone();
    registry
        .invoke(
            "foo",
            &argv(&["--garble", "first", "--garble", "second"]),
            &AmbientArgs::new(),
            &mut env,
        )
        .await
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].str("garble"), Some("second"));
}

#[tokio::test]
async fn test_ambient_injection() {
    fn def() -> CommandDef {
        CommandDef::new("stats")
            .permission(Permission::Anyone)
            .param(Param::ambient("counter"))
    }
    let (registry, seen) = registry_with(def);
    let ambient = AmbientArgs::new().with("counter", Arc::new(7_u64));
    let mut env = TestEnv::anyone();
    registry.invoke("stats", &[], &ambient, &mut env).await.unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(*seen[0].shared::<u64>("counter").unwrap(), 7);
}

#[tokio::test]
async fn test_missing_ambient_is_internal_error() {
    fn def() -> CommandDef {
        CommandDef::new("stats")
            .permission(Permission::Anyone)
            .param(Param::ambient("counter"))
    }
    let (registry, _) = registry_with(def);
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("stats", &[], &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::Internal(_)));
    assert!(!err.is_user_facing());
}

#[tokio::test]
async fn test_body_error_surfaces_as_command_error() {
    struct Failing;

    #[async_trait]
    impl Command for Failing {
        fn def(&self) -> CommandDef {
            CommandDef::new("raiseerror").permission(Permission::Anyone)
        }

        async fn run(&self, _args: Args, _env: &mut dyn Environment) -> CommandResult {
            Err(CommandError::Failed("error command invoked".to_owned()))
        }
    }

    let mut registry = Registry::new();
    registry.register(Box::new(Failing)).unwrap();
    let mut env = TestEnv::anyone();
    let err = registry
        .invoke("raiseerror", &[], &AmbientArgs::new(), &mut env)
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::Command(_)));
    assert!(!err.is_user_facing());
}

#[tokio::test]
async fn test_unregister() {
    let (mut registry, _) = registry_with(frob_def);
    assert_eq!(registry.len(), 1);
    registry.unregister("FOO").unwrap();
    assert!(registry.is_empty());
    assert!(registry.unregister("foo").is_err());
}
