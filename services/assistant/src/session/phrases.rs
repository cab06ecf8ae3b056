//! services/assistant/src/session/phrases.rs
//!
//! Fixed user-facing texts spoken or appended by the session controller.

/// Shown once, when a session first becomes active.
pub const INITIAL_GREETING: &str = "Olá! Eu sou a Sena, sua assistente digital kawaii! ✨💜

Estou aqui para ajudar você com tecnologia de forma simples, paciente e super fofa!

**Sou especialista em ajudar:**
• Pessoas com 60+ anos 👵🏻
• Pessoas com dificuldades visuais ou motoras ♿
• Quem está começando com tecnologia 🌱

**Posso te ensinar sobre:**
📱 Como usar o celular
💬 WhatsApp e mensagens
📧 E-mail
📸 Tirar e enviar fotos
🏦 Banco digital e PIX
🛒 Compras online seguras
⚙️ Configurações do celular

**🎤 NOVIDADE:** Agora você pode me ouvir e falar comigo!
• Clique no ícone de microfone para falar 🎙️
• Clique em \"Ouvir\" em qualquer mensagem 🔊
• Configure a acessibilidade no botão de configurações ⚙️

Escolha uma opção abaixo ou me conte sua dúvida! 💖✨";

/// Replaces the whole log on "new conversation".
pub const RESET_GREETING: &str = "Olá! Eu sou a Sena, sua assistente digital kawaii! ✨💜

Estou aqui para ajudar você com tecnologia de forma simples e paciente.

O que você gostaria de aprender hoje? 🌸";

pub const FREE_TEXT_ACKNOWLEDGEMENT: &str =
    "Entendi! Deixe-me pensar na melhor resposta para você.";

pub const FREE_TEXT_APOLOGY: &str =
    "Desculpe, tive um problema técnico. Pode repetir sua pergunta? 🥺";

pub const ACTION_APOLOGY: &str =
    "Desculpe, tive um problema ao processar esta opção. Tente novamente. 💫";

pub const CONVERSATION_RESET_ANNOUNCEMENT: &str =
    "Nova conversa iniciada! Como posso ajudar você hoje?";

pub const DARK_MODE_ON: &str = "Modo escuro ativado";
pub const DARK_MODE_OFF: &str = "Modo claro ativado";

pub const TTS_ON: &str = "Leitura de voz ativada";
pub const TTS_OFF: &str = "Leitura de voz desativada";
