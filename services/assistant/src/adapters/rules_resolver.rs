//! services/assistant/src/adapters/rules_resolver.rs
//!
//! A local, rule-based implementation of the `ResponseResolver` port.
//! Quick actions map straight to a topic guide; free text is matched against
//! keyword patterns to pick a topic, with a gentle fallback when nothing fits.

use async_trait::async_trait;
use regex::Regex;
use sena_core::ports::{PortError, PortResult, ResponseResolver};
use tracing::debug;

const CELULAR_BASICO: &str = "📱 **Usando o celular, passo a passo:**

1. Para ligar a tela, aperte uma vez o botão da lateral.
2. Arraste o dedo de baixo para cima para desbloquear.
3. Toque uma vez nos ícones para abrir os aplicativos.
4. Para voltar, use a setinha ou o botão de voltar na parte de baixo.

Vá com calma, não tem pressa! Quer que eu explique alguma parte de novo? 💜";

const WIFI: &str = "📶 **Conectando no WiFi:**

1. Abra as **Configurações** (o ícone de engrenagem ⚙️).
2. Toque em **WiFi** ou **Conexões**.
3. Ligue o WiFi e escolha o nome da sua rede.
4. Digite a senha com calma (ela costuma estar embaixo do roteador).

Pronto! O símbolo de WiFi vai aparecer no topo da tela. ✨";

const WHATSAPP: &str = "💬 **WhatsApp sem mistério:**

1. Toque no ícone verde do WhatsApp.
2. Escolha a conversa da pessoa com quem quer falar.
3. Toque na caixa de texto embaixo e escreva sua mensagem.
4. Toque na setinha verde para enviar.

Dica: segure o microfone 🎙️ para mandar um áudio! 💖";

const EMAIL: &str = "📧 **Enviando um e-mail:**

1. Abra o aplicativo de e-mail (por exemplo, o Gmail).
2. Toque em **Escrever** ou no lápis ✏️.
3. No campo **Para**, coloque o endereço da pessoa.
4. Escreva o assunto e a mensagem, e toque em **Enviar**.

Cuidado com e-mails pedindo senha ou dados do banco, eles podem ser golpe! 🛡️";

const CAMERA: &str = "📸 **Tirando e enviando fotos:**

1. Abra o aplicativo **Câmera**.
2. Aponte para o que quer fotografar e segure o celular firme.
3. Toque no botão redondo grande para tirar a foto.
4. Para enviar, abra a **Galeria**, escolha a foto e toque em **Compartilhar**.

Suas fotos ficam guardadas na Galeria! 🌸";

const LIGACAO: &str = "📞 **Fazendo uma ligação:**

1. Toque no ícone do telefone (geralmente verde).
2. Toque em **Contatos** e escolha a pessoa.
3. Toque no botão verde para ligar.
4. Para desligar, toque no botão vermelho.

Você também pode digitar o número no teclado se preferir. 💜";

const COMPRAS: &str = "🛒 **Compras online com segurança:**

1. Prefira lojas conhecidas e confira se o endereço começa com **https**.
2. Desconfie de preços baixos demais.
3. Nunca passe senhas por mensagem.
4. Guarde o comprovante e acompanhe a entrega pelo site da loja.

Na dúvida, peça ajuda para alguém de confiança antes de pagar! 🛡️";

const BANCO: &str = "🏦 **Banco digital e PIX:**

1. Use apenas o aplicativo oficial do seu banco.
2. Para fazer um PIX, toque em **PIX** e depois em **Pagar** ou **Transferir**.
3. Digite a chave (CPF, telefone ou e-mail) e confira o nome de quem vai receber.
4. Confirme o valor antes de finalizar.

O banco nunca liga pedindo sua senha! Se isso acontecer, desligue. 🛡️";

const CONFIGURACOES: &str = "⚙️ **Ajustes que deixam o celular mais confortável:**

1. Abra as **Configurações**.
2. Em **Tela**, aumente o tamanho da letra.
3. Em **Som**, ajuste o volume do toque.
4. Em **Acessibilidade**, ative a leitura de tela se precisar.

Quer ajuda com algum ajuste específico? 🌸";

const OUTROS: &str = "💖 Claro! Me conte sua dúvida com suas palavras, do jeitinho que você imagina.

Posso ajudar com celular, WhatsApp, e-mail, fotos, ligações, compras online, banco digital e configurações. ✨";

const NOT_UNDERSTOOD: &str = "🥺 Não tenho certeza se entendi. Você pode me contar de outro jeito?

Você também pode escolher um dos assuntos: celular, WiFi, WhatsApp, e-mail, câmera, ligações, compras, banco ou configurações. 💜";

/// Reply text for a known quick-action id.
fn topic_reply(action_id: &str) -> Option<&'static str> {
    let reply = match action_id {
        "celular-basico" => CELULAR_BASICO,
        "wifi" => WIFI,
        "whatsapp" => WHATSAPP,
        "email" => EMAIL,
        "camera" => CAMERA,
        "ligacao" => LIGACAO,
        "compras" => COMPRAS,
        "banco" => BANCO,
        "configuracoes" => CONFIGURACOES,
        "outros" => OUTROS,
        _ => return None,
    };
    Some(reply)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

pub struct RulesResolver {
    /// Checked in order; the first matching pattern picks the topic.
    rules: Vec<(Regex, &'static str)>,
}

impl RulesResolver {
    pub fn new() -> PortResult<Self> {
        let patterns: [(&str, &'static str); 9] = [
            (r"whats|zap|mensage", "whatsapp"),
            (r"wi-?fi|internet|rede", "wifi"),
            (r"e-?mail|gmail", "email"),
            (r"c[aâ]mera|foto|selfie", "camera"),
            (r"liga[cç][aã]o|ligar|telefonar", "ligacao"),
            (r"pix|banco|transfer", "banco"),
            (r"compra|loja|comprar", "compras"),
            (r"configura|ajuste|letra|volume", "configuracoes"),
            (r"celular|tela|aplicativo|app", "celular-basico"),
        ];

        let rules = patterns
            .into_iter()
            .map(|(pattern, topic)| {
                Regex::new(&format!("(?i){pattern}"))
                    .map(|re| (re, topic))
                    .map_err(|e| PortError::Unexpected(e.to_string()))
            })
            .collect::<PortResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    fn classify(&self, utterance: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(utterance))
            .map(|(_, topic)| *topic)
    }
}

//=========================================================================================
// `ResponseResolver` Trait Implementation
//=========================================================================================

#[async_trait]
impl ResponseResolver for RulesResolver {
    async fn resolve(&self, action_id: &str, utterance: Option<&str>) -> PortResult<String> {
        if !action_id.is_empty() {
            return topic_reply(action_id)
                .map(str::to_string)
                .ok_or_else(|| PortError::NotFound(format!("quick action '{action_id}'")));
        }

        let utterance = utterance
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PortError::Unexpected("nothing to resolve".to_string()))?;

        let reply = match self.classify(utterance) {
            Some(topic) => {
                debug!(topic, "Free text matched a topic.");
                topic_reply(topic).unwrap_or(NOT_UNDERSTOOD)
            }
            None => NOT_UNDERSTOOD,
        };
        Ok(reply.to_string())
    }
}
