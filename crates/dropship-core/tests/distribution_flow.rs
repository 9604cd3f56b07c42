//! Document-to-resolution flow: extraction feeding the coordinator.

use dropship_core::{extract, resolve, DistributeConfig, DropReason, ReconcileAction};
use dropship_io::fakes::{MemoryTree, ScriptedGate};

const DOC: &str = r#"# Drop 42

Schema update plus a new UI module.

```prisma
// prisma/schema.prisma
enum Role {
  USER
}

model User {
  id   Int  @id
  role Role
}
```

```js
// src/ui/Button.js
import styled from "styled-components";

export const Button = styled.button`
  color: red;
`;
```

```bash
npm install
```

```shell
npx prisma migrate dev
```
"#;

#[tokio::test]
async fn scenario_one_file_one_command_in_order() {
    let doc = "```js\n// src/a.js\nconst a = 1;\n```\n\n```shell\necho hi\n```\n";
    let manifest = extract(doc, &DistributeConfig::default());
    assert_eq!(manifest.files.len(), 1);
    assert_eq!(manifest.files[0].path, "src/a.js");
    assert_eq!(manifest.commands, vec!["echo hi"]);
}

#[tokio::test]
async fn fresh_tree_everything_overwrites_without_prompts() {
    let config = DistributeConfig::default();
    let manifest = extract(DOC, &config);
    assert_eq!(manifest.files.len(), 2);
    assert_eq!(manifest.commands.len(), 2);

    let gate = ScriptedGate::new();
    let tree = MemoryTree::new();
    let resolution = resolve(&manifest, &gate, &tree, &config).await.unwrap();

    assert_eq!(resolution.files.len(), 2);
    assert!(resolution
        .files
        .iter()
        .all(|f| f.action == ReconcileAction::Overwrite));
    assert_eq!(resolution.commands.len(), 2);
    assert!(resolution.drops.is_empty());
    assert_eq!(gate.asked(), 0, "nothing existing, nothing to confirm");
}

#[tokio::test]
async fn superset_schema_overwrites_with_zero_prompts() {
    let config = DistributeConfig::default();
    // On-disk schema is a strict subset of the incoming one.
    let tree = MemoryTree::with_files([(
        "prisma/schema.prisma",
        "model User {\n  id Int @id\n}\n",
    )]);
    let gate = ScriptedGate::new();
    let manifest = extract(DOC, &config);
    let resolution = resolve(&manifest, &gate, &tree, &config).await.unwrap();

    assert!(resolution
        .files
        .iter()
        .any(|f| f.artifact.path == "prisma/schema.prisma"));
    assert_eq!(gate.asked(), 0);
}

#[tokio::test]
async fn declined_shrinking_schema_prunes_schema_commands_only() {
    let config = DistributeConfig::default();
    // On-disk schema has an ADMIN value the incoming document lost.
    let tree = MemoryTree::with_files([(
        "prisma/schema.prisma",
        "enum Role {\n  USER\n  ADMIN\n}\n\nmodel User {\n  id Int @id\n  role Role\n}\n",
    )]);
    let gate = ScriptedGate::with_answers([false]);
    let manifest = extract(DOC, &config);
    let resolution = resolve(&manifest, &gate, &tree, &config).await.unwrap();

    // Schema dropped, Button survives.
    assert_eq!(resolution.files.len(), 1);
    assert_eq!(resolution.files[0].artifact.path, "src/ui/Button.js");

    // npx prisma pruned, npm install kept.
    assert_eq!(resolution.commands, vec!["npm install"]);
    assert!(resolution
        .drops
        .iter()
        .any(|d| d.reason == DropReason::SchemaCommandPruned
            && d.what == "npx prisma migrate dev"));
    assert!(resolution
        .drops
        .iter()
        .any(|d| d.reason == DropReason::SchemaDeclined));
    assert_eq!(gate.asked(), 1);
}

#[tokio::test]
async fn export_merge_keeps_existing_module_content() {
    let config = DistributeConfig::default();
    let existing = "import styled from \"styled-components\";\n\n\
                    export const Card = styled.div`\n  border: 1px solid;\n`;\n";
    let tree = MemoryTree::with_files([("src/ui/Button.js", existing)]);
    let gate = ScriptedGate::new();
    let manifest = extract(DOC, &config);
    let resolution = resolve(&manifest, &gate, &tree, &config).await.unwrap();

    let button = resolution
        .files
        .iter()
        .find(|f| f.artifact.path == "src/ui/Button.js")
        .unwrap();
    assert_eq!(button.action, ReconcileAction::Merge);
    assert!(button.artifact.code.contains("export const Card"));
    assert!(button.artifact.code.contains("export const Button"));
    assert_eq!(gate.asked(), 0, "additive merge needs no confirmation");
}

#[tokio::test]
async fn denylisted_path_never_reaches_a_reconciler() {
    let mut config = DistributeConfig::default();
    config.denylist.push("src/ui/Button.js".to_string());
    let gate = ScriptedGate::new();
    let tree = MemoryTree::new();
    let manifest = extract(DOC, &config);
    let resolution = resolve(&manifest, &gate, &tree, &config).await.unwrap();

    assert!(resolution
        .files
        .iter()
        .all(|f| f.artifact.path != "src/ui/Button.js"));
    assert!(resolution
        .drops
        .iter()
        .any(|d| d.reason == DropReason::Denylisted && d.what == "src/ui/Button.js"));
}
