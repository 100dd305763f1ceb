// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与本地文件系统的交互。
///
/// 包含的子模块：
/// - 诊断（diagnostics）：将失败页面保存到本地目录
/// - 导出（export）：将结果写出为 CSV 或 JSON
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知具体实现。
pub mod diagnostics;
pub mod export;
