//! Template content for generated project files.
//!
//! Templates are plain string literals with explicit placeholder
//! substitution; no code evaluation is involved.

/// Template for the component entry module.
/// Contains a `{package_name}` placeholder for substitution.
pub const COMPONENT_ENTRY_TEMPLATE: &str = r#"import * as path from "path"
import { pri } from "{package_name}"

interface IResult {
  customPlugin: {
    hasComponents: boolean
  }
}

export default async (instance: typeof pri) => {
  instance.commands.registerCommand({
    name: ["deploy"],
    action: async () => {
      //
    }
  })

  instance.commands.expandCommand({
    name: ["init"],
    beforeAction: async (...args: any[]) => {
      //
    }
  })

  instance.project.onAnalyseProject(files => {
    return { customPlugin: { hasComponents: judgeHasComponents(instance.projectRootPath, files) } } as IResult
  })

  instance.project.onCreateEntry((analyseInfo: IResult, entry) => {
    if (!analyseInfo.customPlugin.hasComponents) {
      return
    }

    entry.pipeAppHeader(header => {
      return `
        ${header}
        import "src/components/xxx"
      `
    })
  })
}

export function judgeHasComponents(projectRootPath: string, files: path.ParsedPath[]) {
  return files.some(file => {
    const relativePath = path.relative(projectRootPath, path.join(file.dir, file.name))
    if (relativePath.startsWith("src/components")) {
      return true
    }
    return false
  })
}
"#;

/// Template for the scaffolded test stub.
pub const TEST_STUB_TEMPLATE: &str = r#"import * as path from "path"
import { judgeHasComponents } from "../src"

const testProjectRootPath = "/Users/someOne/workspace"

const testFilePaths = (filePaths: string[]) =>
  filePaths.map(filePath => path.join(testProjectRootPath, filePath)).map(filePath => path.parse(filePath))

test("Single file", () => {
  const relativeProjectFiles = ["src/components"]
  expect(judgeHasComponents(testProjectRootPath, testFilePaths(relativeProjectFiles))).toBe(true)
})

test("Multiple files", () => {
  const relativeProjectFiles = [
    "src/components/index.tsx",
    "src/components/button/index.tsx",
    "src/components/select/index.tsx"
  ]
  expect(judgeHasComponents(testProjectRootPath, testFilePaths(relativeProjectFiles))).toBe(true)
})

test("hasn't components", () => {
  const relativeProjectFiles = ["src/pages/index.tsx"]
  expect(judgeHasComponents(testProjectRootPath, testFilePaths(relativeProjectFiles))).toBe(false)
})
"#;
